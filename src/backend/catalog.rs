use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::info;

use super::{BackendError, CloudManager};
use crate::cloud::{
    Credentials, Job, JobStatus, Machine, MachineConfiguration, MachineImage, Network, ProviderAccount, ResourceId, ResourceRef,
};
use crate::compat::Category;
use crate::wizard::MachineCreate;

/// Everything the console knows about, as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Provider accounts keyed by tenant id.
    #[serde(default)]
    tenants: HashMap<String, Vec<ProviderAccount>>,
    #[serde(default)]
    images: Vec<MachineImage>,
    #[serde(default)]
    machine_configurations: Vec<MachineConfiguration>,
    #[serde(default)]
    networks: Vec<Network>,
    #[serde(default)]
    machines: Vec<Machine>,
    #[serde(default)]
    credentials: Vec<Credentials>,
    /// Categories whose listing fails, to rehearse a degraded backend.
    #[serde(default)]
    unavailable: HashSet<Category>,
}

#[allow(unused)]
impl Catalog {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(json: &str) -> Result<Self, BackendError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add_account(&mut self, tenant_id: impl Into<String>, account: ProviderAccount) -> &mut Self {
        self.tenants.entry(tenant_id.into()).or_default().push(account);
        self
    }

    pub fn add_image(&mut self, image: MachineImage) -> &mut Self {
        self.images.push(image);
        self
    }

    pub fn add_configuration(&mut self, config: MachineConfiguration) -> &mut Self {
        self.machine_configurations.push(config);
        self
    }

    pub fn add_network(&mut self, network: Network) -> &mut Self {
        self.networks.push(network);
        self
    }

    pub fn add_machine(&mut self, machine: Machine) -> &mut Self {
        self.machines.push(machine);
        self
    }

    pub fn add_credentials(&mut self, credentials: Credentials) -> &mut Self {
        self.credentials.push(credentials);
        self
    }

    pub fn mark_unavailable(&mut self, category: Category) -> &mut Self {
        self.unavailable.insert(category);
        self
    }

    fn check(&self, category: Category) -> Result<(), BackendError> {
        if self.unavailable.contains(&category) {
            return Err(BackendError::Unavailable(category.as_str()));
        }
        Ok(())
    }

    fn account(&self, id: &ResourceId) -> Option<&ProviderAccount> {
        self.tenants.values().flatten().find(|a| a.id() == id)
    }
}

/// In-memory backend serving a [`Catalog`]. Created machines are appended to
/// the catalog so they show up as placement hosts afterwards.
#[derive(Debug, Default)]
pub struct CatalogBackend {
    catalog: Mutex<Catalog>,
    jobs: Mutex<u64>,
}

impl CatalogBackend {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            jobs: Mutex::new(0),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        Ok(Self::new(Catalog::from_file(path)?))
    }

    fn read<T>(&self, f: impl FnOnce(&Catalog) -> Result<T, BackendError>) -> Result<T, BackendError> {
        let catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        f(&catalog)
    }

    fn next_job_number(&self) -> u64 {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        *jobs += 1;
        *jobs
    }
}

#[async_trait]
impl CloudManager for CatalogBackend {
    async fn provider_accounts(&self, tenant_id: &str) -> Result<Vec<ProviderAccount>, BackendError> {
        self.read(|c| Ok(c.tenants.get(tenant_id).cloned().unwrap_or_default()))
    }

    async fn machine_images(&self) -> Result<Vec<MachineImage>, BackendError> {
        self.read(|c| {
            c.check(Category::Images)?;
            Ok(c.images.clone())
        })
    }

    async fn machine_configurations(&self) -> Result<Vec<MachineConfiguration>, BackendError> {
        self.read(|c| {
            c.check(Category::MachineConfigurations)?;
            Ok(c.machine_configurations.clone())
        })
    }

    async fn networks(&self) -> Result<Vec<Network>, BackendError> {
        self.read(|c| {
            c.check(Category::Networks)?;
            Ok(c.networks.clone())
        })
    }

    async fn machines(&self) -> Result<Vec<Machine>, BackendError> {
        self.read(|c| {
            c.check(Category::HostMachines)?;
            Ok(c.machines.clone())
        })
    }

    async fn credentials(&self) -> Result<Vec<Credentials>, BackendError> {
        self.read(|c| Ok(c.credentials.clone()))
    }

    async fn create_machine(&self, request: &MachineCreate) -> Result<Job, BackendError> {
        let job_number = self.next_job_number();
        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);

        let account = catalog
            .account(request.provider_account_id())
            .ok_or_else(|| BackendError::Rejected(format!("unknown provider account {}", request.provider_account_id())))?;

        let location = account
            .provider()
            .locations()
            .iter()
            .find(|l| l.matches_constraint(request.location()))
            .cloned()
            .ok_or_else(|| {
                BackendError::Rejected(format!(
                    "provider '{}' has no location matching '{}'",
                    account.provider().description(),
                    request.location()
                ))
            })?;

        if catalog.machines.iter().any(|m| m.name() == request.name()) {
            return Err(BackendError::Rejected(format!("a machine named '{}' already exists", request.name())));
        }

        let machine = Machine::new(
            format!("machine-{job_number}"),
            request.name(),
            request.provider_account_id().clone(),
            location,
        )
        .with_state("CREATING");
        catalog.machines.push(machine.clone());

        info!(machine = %machine.id(), name = machine.name(), "machine recorded in catalog");

        Ok(Job::new(
            format!("job-{job_number}"),
            JobStatus::Running,
            vec![ResourceRef::Machine(machine)],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::{Selection, refresh};
    use crate::testing::sample_catalog;
    use crate::wizard::MachineCreateBuilder;
    use std::io::Write;

    async fn request(backend: &CatalogBackend, name: &str) -> MachineCreate {
        let offered = refresh(backend, &Selection::new("acc-ovh", Some("France".into())), true).await;
        let mut builder = MachineCreateBuilder::new();
        builder
            .set_name(name)
            .set_image(Some("img-debian".into()))
            .set_config(Some("cfg-medium".into()));
        builder.build(&offered).unwrap()
    }

    #[tokio::test]
    async fn test_create_machine_returns_new_machine_first() {
        let backend = CatalogBackend::new(sample_catalog());
        let req = request(&backend, "api-1").await;

        let job = backend.create_machine(&req).await.unwrap();

        let machine = job.created_machine().unwrap();
        assert_eq!(machine.name(), "api-1");
        assert_eq!(machine.provider_account_id().as_str(), "acc-ovh");
        assert_eq!(machine.location().country_code(), "FR");
        assert_eq!(job.status(), JobStatus::Running);

        let machines = backend.machines().await.unwrap();
        assert!(machines.iter().any(|m| m.name() == "api-1"));
    }

    #[tokio::test]
    async fn test_create_machine_rejects_duplicate_name() {
        let backend = CatalogBackend::new(sample_catalog());
        let req = request(&backend, "web-1").await;

        let err = backend.create_machine(&req).await.unwrap_err();

        assert!(matches!(err, BackendError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_unknown_tenant_has_no_accounts() {
        let backend = CatalogBackend::new(sample_catalog());
        assert!(backend.provider_accounts("nobody").await.unwrap().is_empty());
        assert_eq!(backend.provider_accounts("tenant-a").await.unwrap().len(), 2);
    }

    #[test]
    fn test_catalog_from_file() {
        let json = serde_json::to_string(&sample_catalog()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = Catalog::from_file(file.path()).unwrap();

        assert_eq!(catalog.images.len(), sample_catalog().images.len());
        assert!(catalog.check(Category::Images).is_ok());
    }

    #[test]
    fn test_unavailable_category_from_json() {
        let catalog = Catalog::from_json_str(r#"{ "unavailable": ["networks"] }"#).unwrap();

        assert!(matches!(catalog.check(Category::Networks), Err(BackendError::Unavailable("networks"))));
        assert!(catalog.check(Category::Images).is_ok());
    }
}
