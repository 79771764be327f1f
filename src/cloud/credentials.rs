use serde::{Deserialize, Serialize};

use super::ResourceId;

/// SSH key pair registered by the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    id: ResourceId,
    name: String,
}

impl Credentials {
    pub fn new(id: impl Into<ResourceId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
