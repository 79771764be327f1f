use serde::{Deserialize, Serialize};

use super::{ProviderMapping, ResourceId};

/// Machine image published in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineImage {
    id: ResourceId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mappings: Vec<ProviderMapping>,
}

#[allow(unused)]
impl MachineImage {
    pub fn new(id: impl Into<ResourceId>, name: impl Into<String>, mappings: Vec<ProviderMapping>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            mappings,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Image name
    /// eg. ubuntu-24.04-server
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn mappings(&self) -> &[ProviderMapping] {
        &self.mappings
    }
}
