//! Backend managers the wizard talks to.
//!
//! The wizard only ever sees the [`CloudManager`] trait; where the data comes
//! from (a local JSON catalog or the console's REST API) is decided once at
//! startup from the settings.

mod catalog;
mod http;

pub use catalog::{Catalog, CatalogBackend};
pub use http::HttpBackend;

use async_trait::async_trait;

use crate::cloud::{Credentials, Job, Machine, MachineConfiguration, MachineImage, Network, ProviderAccount};
use crate::wizard::MachineCreate;

#[async_trait]
pub trait CloudManager: Send + Sync {
    async fn provider_accounts(&self, tenant_id: &str) -> Result<Vec<ProviderAccount>, BackendError>;

    async fn machine_images(&self) -> Result<Vec<MachineImage>, BackendError>;

    async fn machine_configurations(&self) -> Result<Vec<MachineConfiguration>, BackendError>;

    async fn networks(&self) -> Result<Vec<Network>, BackendError>;

    async fn machines(&self) -> Result<Vec<Machine>, BackendError>;

    async fn credentials(&self) -> Result<Vec<Credentials>, BackendError>;

    /// Submit the creation request. The returned job's first affected
    /// resource is the new machine.
    async fn create_machine(&self, request: &MachineCreate) -> Result<Job, BackendError>;
}

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("{0} are currently unavailable")]
    Unavailable(&'static str),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
