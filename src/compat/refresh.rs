use serde::{Deserialize, Serialize};
use std::fmt;

use tracing::{debug, warn};

use super::{Selection, filter_and_sort_configurations, filter_host_machines, filter_images, filter_networks};
use crate::backend::{BackendError, CloudManager};
use crate::cloud::{Machine, MachineConfiguration, MachineImage, Network, ResourceId};

/// Candidate lists the filter works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Images,
    MachineConfigurations,
    Networks,
    HostMachines,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::MachineConfigurations => "hardware configurations",
            Category::Networks => "networks",
            Category::HostMachines => "host machines",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The list of one category could not be fetched. Non-fatal: the category is
/// offered empty and the rest of the wizard keeps working.
#[derive(thiserror::Error, Debug)]
#[error("failed to retrieve {category}: {source}")]
pub struct RetrievalError {
    category: Category,
    #[source]
    source: BackendError,
}

impl RetrievalError {
    pub fn new(category: Category, source: BackendError) -> Self {
        Self { category, source }
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// One consistent snapshot of the four filtered lists for a selection.
#[derive(Debug)]
pub struct CompatibleResources {
    selection: Selection,
    images: Result<Vec<MachineImage>, RetrievalError>,
    configurations: Result<Vec<MachineConfiguration>, RetrievalError>,
    networks: Result<Vec<Network>, RetrievalError>,
    host_machines: Result<Vec<Machine>, RetrievalError>,
}

fn offered<T>(category: &Result<Vec<T>, RetrievalError>) -> &[T] {
    category.as_ref().map(Vec::as_slice).unwrap_or_default()
}

#[allow(unused)]
impl CompatibleResources {
    /// Snapshot offering nothing, used before the first refresh and whenever
    /// the location is unset.
    pub fn empty(selection: Selection) -> Self {
        Self {
            selection,
            images: Ok(Vec::new()),
            configurations: Ok(Vec::new()),
            networks: Ok(Vec::new()),
            host_machines: Ok(Vec::new()),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn images(&self) -> &[MachineImage] {
        offered(&self.images)
    }

    pub fn configurations(&self) -> &[MachineConfiguration] {
        offered(&self.configurations)
    }

    pub fn networks(&self) -> &[Network] {
        offered(&self.networks)
    }

    pub fn host_machines(&self) -> &[Machine] {
        offered(&self.host_machines)
    }

    pub fn image(&self, id: &ResourceId) -> Option<&MachineImage> {
        self.images().iter().find(|i| i.id() == id)
    }

    pub fn configuration(&self, id: &ResourceId) -> Option<&MachineConfiguration> {
        self.configurations().iter().find(|c| c.id() == id)
    }

    pub fn network(&self, id: &ResourceId) -> Option<&Network> {
        self.networks().iter().find(|n| n.id() == id)
    }

    pub fn host_machine(&self, id: &ResourceId) -> Option<&Machine> {
        self.host_machines().iter().find(|m| m.id() == id)
    }

    /// Retrieval failures of this snapshot, one per failed category.
    pub fn notices(&self) -> Vec<&RetrievalError> {
        [
            self.images.as_ref().err(),
            self.configurations.as_ref().err(),
            self.networks.as_ref().err(),
            self.host_machines.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Fetch the four candidate lists and filter them for `selection`.
///
/// The fetches run concurrently but filtering only starts once every list is
/// fully materialized. Host machines are only fetched when `include_hosts`
/// is set.
pub async fn refresh(backend: &dyn CloudManager, selection: &Selection, include_hosts: bool) -> CompatibleResources {
    if selection.location().is_none() {
        debug!(account = %selection.account(), "location unset, offering no resources");
        return CompatibleResources::empty(selection.clone());
    }

    let hosts = async {
        if include_hosts {
            backend.machines().await
        } else {
            Ok(Vec::new())
        }
    };

    let (images, configurations, networks, host_machines) = futures::join!(
        backend.machine_images(),
        backend.machine_configurations(),
        backend.networks(),
        hosts
    );

    let snapshot = CompatibleResources {
        selection: selection.clone(),
        images: images
            .map(|all| filter_images(&all, selection))
            .map_err(|e| RetrievalError::new(Category::Images, e)),
        configurations: configurations
            .map(|all| filter_and_sort_configurations(&all, selection))
            .map_err(|e| RetrievalError::new(Category::MachineConfigurations, e)),
        networks: networks
            .map(|all| filter_networks(&all, selection))
            .map_err(|e| RetrievalError::new(Category::Networks, e)),
        host_machines: host_machines
            .map(|all| filter_host_machines(&all, selection))
            .map_err(|e| RetrievalError::new(Category::HostMachines, e)),
    };

    for notice in snapshot.notices() {
        warn!(category = %notice.category(), "{notice}");
    }

    debug!(
        account = %selection.account(),
        location = ?selection.location(),
        images = snapshot.images().len(),
        configurations = snapshot.configurations().len(),
        networks = snapshot.networks().len(),
        host_machines = snapshot.host_machines().len(),
        "refreshed compatible resources"
    );

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CatalogBackend;
    use crate::testing::sample_catalog;

    fn at(account: &str, location: &str) -> Selection {
        Selection::new(account, Some(location.into()))
    }

    #[tokio::test]
    async fn test_refresh_filters_every_category() {
        let backend = CatalogBackend::new(sample_catalog());

        let snapshot = refresh(&backend, &at("acc-ovh", "France"), true).await;

        assert!(snapshot.notices().is_empty());
        let images: Vec<_> = snapshot.images().iter().map(|i| i.name()).collect();
        assert_eq!(images, vec!["ubuntu-24.04", "debian-12"]);
        let configs: Vec<_> = snapshot.configurations().iter().map(|c| c.name()).collect();
        assert_eq!(configs, vec!["small", "medium", "large"]);
        let networks: Vec<_> = snapshot.networks().iter().map(|n| n.name()).collect();
        assert_eq!(networks, vec!["public", "private-fr"]);
        let hosts: Vec<_> = snapshot.host_machines().iter().map(|m| m.name()).collect();
        assert_eq!(hosts, vec!["web-1"]);
    }

    #[tokio::test]
    async fn test_failed_category_is_empty_and_reported() {
        let mut catalog = sample_catalog();
        catalog.mark_unavailable(Category::Networks);
        let backend = CatalogBackend::new(catalog);

        let snapshot = refresh(&backend, &at("acc-ovh", "France"), true).await;

        assert!(snapshot.networks().is_empty());
        assert!(!snapshot.images().is_empty());
        assert!(!snapshot.configurations().is_empty());
        let notices = snapshot.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].category(), Category::Networks);
    }

    #[tokio::test]
    async fn test_hosts_not_fetched_without_host_placement() {
        let mut catalog = sample_catalog();
        catalog.mark_unavailable(Category::HostMachines);
        let backend = CatalogBackend::new(catalog);

        let snapshot = refresh(&backend, &at("acc-ovh", "France"), false).await;

        assert!(snapshot.host_machines().is_empty());
        assert!(snapshot.notices().is_empty());
    }

    #[tokio::test]
    async fn test_unset_location_offers_nothing() {
        let backend = CatalogBackend::new(sample_catalog());

        let snapshot = refresh(&backend, &Selection::new("acc-ovh", None), true).await;

        assert!(snapshot.images().is_empty());
        assert!(snapshot.configurations().is_empty());
        assert!(snapshot.networks().is_empty());
        assert!(snapshot.host_machines().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_by_id_in_snapshot() {
        let backend = CatalogBackend::new(sample_catalog());

        let snapshot = refresh(&backend, &at("acc-ovh", "France"), true).await;

        assert!(snapshot.image(&"img-ubuntu".into()).is_some());
        assert!(snapshot.image(&"img-windows".into()).is_none());
        assert!(snapshot.network(&"net-public".into()).is_some());
    }
}
