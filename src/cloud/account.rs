use serde::{Deserialize, Serialize};

use super::{Location, ResourceId};

/// Cloud provider descriptor shared by every account opened on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProvider {
    id: ResourceId,
    description: String,
    #[serde(default)]
    locations: Vec<Location>,
}

#[allow(unused)]
impl CloudProvider {
    pub fn new(id: impl Into<ResourceId>, description: impl Into<String>, locations: Vec<Location>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            locations,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Human readable name
    /// eg. "OpenStack (OVH)"
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

/// A tenant's credential/config binding to a specific cloud provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAccount {
    id: ResourceId,
    provider: CloudProvider,
}

impl ProviderAccount {
    pub fn new(id: impl Into<ResourceId>, provider: CloudProvider) -> Self {
        Self { id: id.into(), provider }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn provider(&self) -> &CloudProvider {
        &self.provider
    }
}
