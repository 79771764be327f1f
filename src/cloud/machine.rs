use serde::{Deserialize, Serialize};

use super::{Location, ResourceId};

/// An existing machine. Used as a host for placement rules and returned as
/// the affected resource of a creation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    id: ResourceId,
    name: String,
    provider_account_id: ResourceId,
    location: Location,
    #[serde(default)]
    state: Option<String>,
}

#[allow(unused)]
impl Machine {
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
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
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

    /// eg. CREATING, STARTED
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}
