use serde::{Deserialize, Serialize};

use super::{LocationConstraint, ResourceId};

/// Published association between a catalog resource and one
/// (provider account, location) pair where it can be instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMapping {
    provider_account_id: ResourceId,
    location: LocationConstraint,
    /// Identifier of the resource on the provider side (image id, flavor...).
    #[serde(default)]
    provider_asset_id: Option<String>,
}

#[allow(unused)]
impl ProviderMapping {
    pub fn new(provider_account_id: impl Into<ResourceId>, location: impl Into<LocationConstraint>) -> Self {
        Self {
            provider_account_id: provider_account_id.into(),
            location: location.into(),
            provider_asset_id: None,
        }
    }

    pub fn with_provider_asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.provider_asset_id = Some(asset_id.into());
        self
    }

    pub fn provider_account_id(&self) -> &ResourceId {
        &self.provider_account_id
    }

    pub fn location(&self) -> &LocationConstraint {
        &self.location
    }

    pub fn provider_asset_id(&self) -> Option<&str> {
        self.provider_asset_id.as_deref()
    }

    /// Mapping lookup is an exact match on both the account and the location.
    pub fn is_for(&self, account: &ResourceId, location: &LocationConstraint) -> bool {
        &self.provider_account_id == account && &self.location == location
    }
}

/// Return the first mapping of `mappings` published for `(account, location)`.
pub fn find_mapping<'a>(
    mappings: &'a [ProviderMapping],
    account: &ResourceId,
    location: &LocationConstraint,
) -> Option<&'a ProviderMapping> {
    mappings.iter().find(|m| m.is_for(account, location))
}
