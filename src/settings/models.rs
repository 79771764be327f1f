use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Where the wizard gets its data from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendSettings {
    /// Local JSON catalog; relative paths resolve against the settings file.
    Catalog { path: PathBuf },
    /// Console REST API.
    Http { url: Url },
}

/// Public model; serde is confined to this module tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub(crate) tenant_id: String,
    #[serde(default = "default_host_placement")]
    pub(crate) host_placement: bool,
    pub(crate) backend: BackendSettings,
}

fn default_host_placement() -> bool {
    true
}

impl Settings {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Whether the placement step (and the host machine list) is part of
    /// the flow.
    pub fn host_placement(&self) -> bool {
        self.host_placement
    }

    pub fn backend(&self) -> &BackendSettings {
        &self.backend
    }
}
