use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{BackendError, CloudManager};
use crate::cloud::{Credentials, Job, Machine, MachineConfiguration, MachineImage, Network, ProviderAccount};
use crate::wizard::MachineCreate;

const USER_AGENT: &str = "machine-wizard-rust/1.0";

/// Collections come back wrapped in an `items` envelope.
#[derive(Debug, Deserialize)]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// REST client for the console's manager API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url) -> Result<Self, BackendError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        // Url::join drops the last path segment unless it ends with '/'
        let base = if base.path().ends_with('/') {
            base
        } else {
            Url::parse(&format!("{base}/"))?
        };

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base.join(path)?)
    }

    fn checked(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    async fn get_items<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, BackendError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");

        let response = self.client.get(url).send().await?;
        let list: ItemList<T> = Self::checked(response)?.json().await?;
        Ok(list.items)
    }
}

#[async_trait]
impl CloudManager for HttpBackend {
    async fn provider_accounts(&self, tenant_id: &str) -> Result<Vec<ProviderAccount>, BackendError> {
        self.get_items(&format!("tenants/{tenant_id}/provider-accounts")).await
    }

    async fn machine_images(&self) -> Result<Vec<MachineImage>, BackendError> {
        self.get_items("machine-images").await
    }

    async fn machine_configurations(&self) -> Result<Vec<MachineConfiguration>, BackendError> {
        self.get_items("machine-configurations").await
    }

    async fn networks(&self) -> Result<Vec<Network>, BackendError> {
        self.get_items("networks").await
    }

    async fn machines(&self) -> Result<Vec<Machine>, BackendError> {
        self.get_items("machines").await
    }

    async fn credentials(&self) -> Result<Vec<Credentials>, BackendError> {
        self.get_items("credentials").await
    }

    async fn create_machine(&self, request: &MachineCreate) -> Result<Job, BackendError> {
        let url = self.endpoint("machines")?;
        debug!(%url, name = request.name(), "POST");

        let response = self.client.post(url).json(request).send().await?;
        Ok(Self::checked(response)?.json().await?)
    }
}
