use serde::{Deserialize, Serialize};

use super::{Location, ResourceId};

/// Network provisioned directly on one provider account, in one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    id: ResourceId,
    name: String,
    provider_account_id: ResourceId,
    location: Location,
}

impl Network {
    pub fn new(
        id: impl Into<ResourceId>,
        name: impl Into<String>,
        provider_account_id: impl Into<ResourceId>,
        location: Location,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider_account_id: provider_account_id.into(),
            location,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider_account_id(&self) -> &ResourceId {
        &self.provider_account_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}
