pub mod picker;
pub mod user_data;

use self::picker::Picker;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::wizard::WizardError;

/// Label of the entry that stands for "no choice" in optional pickers.
pub const NONE_LABEL: &str = "(none)";

/// Wrapper around the `termenu` picker that keeps the UX consistent across the
/// project. Cancelling the menu aborts the wizard.
pub fn choose_index<S: Display>(title: &str, items: Vec<S>) -> Result<usize> {
    match Picker::new(title, items).pick_index()? {
        Some(idx) => Ok(idx),
        None => Err(WizardError::Cancelled.into()),
    }
}

pub fn choose_one<S: Display>(title: &str, items: Vec<S>) -> Result<S> {
    match Picker::new(title, items).pick()? {
        Some(item) => Ok(item),
        None => Err(WizardError::Cancelled.into()),
    }
}

/// Same as [`choose_index`] with a leading "(none)" entry.
pub fn choose_optional<S: Display>(title: &str, items: Vec<S>) -> Result<Option<usize>> {
    let mut labels = vec![NONE_LABEL.to_string()];
    labels.extend(items.iter().map(|i| i.to_string()));

    let idx = choose_index(title, labels)?;
    Ok(idx.checked_sub(1))
}

pub fn confirm(title: &str) -> Result<bool> {
    Ok(choose_index(title, vec!["Yes", "No"])? == 0)
}

/// Read one line from stdin, without the trailing newline.
pub fn prompt_line(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line).context("read from stdin")?;
    if read == 0 {
        return Err(WizardError::Cancelled.into());
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Spinner shown while waiting on the backend.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
