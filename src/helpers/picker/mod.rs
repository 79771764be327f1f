use anyhow::{Context, Result};
use std::fmt::Display;
use termenu::{Item, Menu};

pub struct Picker<T> {
    title: String,
    items: Vec<T>,
}

impl<T> Picker<T>
where
    T: Display,
{
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Show an fzf-like menu and return the index of the selected item.
    /// `None` if the user cancelled.
    pub fn pick_index(&self) -> Result<Option<usize>> {
        let mut menu = Menu::new().context("failed to init menu")?;

        // Build menu entries
        let list: Vec<Item<usize>> = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| Item::new(&item.to_string(), idx))
            .collect();

        let selected = menu
            .set_title(self.title.as_str())
            .add_list(list)
            .select()
            .context("menu error")?;

        Ok(selected.copied())
    }

    /// Like [`Picker::pick_index`] but hands back the item itself.
    pub fn pick(mut self) -> Result<Option<T>> {
        Ok(self.pick_index()?.map(|idx| self.items.swap_remove(idx)))
    }
}
