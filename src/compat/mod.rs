//! Provider-account/location scoped resource compatibility filter.
//!
//! Given the operator's current [`Selection`], narrows the catalog down to the
//! images, hardware configurations, networks and host machines that can be
//! used to create a machine under that account, in that location.
//!
//! Two inclusion rules exist. Catalog resources (images, configurations) are
//! published through [`ProviderMapping`]s and need a mapping for exactly the
//! selected account and location. Resources provisioned directly on an
//! account (networks, machines) carry their own account and location, and
//! the location only has to satisfy the constraint
//! (see [`Location::matches_constraint`]).

mod refresh;

pub use refresh::{Category, CompatibleResources, RetrievalError, refresh};

use crate::cloud::{
    Location, LocationConstraint, Machine, MachineConfiguration, MachineImage, Network, ProviderMapping,
    ResourceId, find_mapping,
};

/// Current (provider account, location) pair picked by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    account: ResourceId,
    location: Option<LocationConstraint>,
}

impl Selection {
    pub fn new(account: impl Into<ResourceId>, location: Option<LocationConstraint>) -> Self {
        Self {
            account: account.into(),
            location,
        }
    }

    pub fn account(&self) -> &ResourceId {
        &self.account
    }

    /// `None` while the operator has not picked a location yet.
    pub fn location(&self) -> Option<&LocationConstraint> {
        self.location.as_ref()
    }
}

/// How a resource decides whether it is usable under a selection.
#[derive(Debug, Clone, Copy)]
pub enum MatchStrategy<'a> {
    /// Published in the catalog for a set of (account, location) pairs.
    Mapped(&'a [ProviderMapping]),
    /// Provisioned on one account, in one location.
    Direct {
        account: &'a ResourceId,
        location: &'a Location,
    },
}

pub trait Filterable {
    fn match_strategy(&self) -> MatchStrategy<'_>;
}

impl Filterable for MachineImage {
    fn match_strategy(&self) -> MatchStrategy<'_> {
        MatchStrategy::Mapped(self.mappings())
    }
}

impl Filterable for MachineConfiguration {
    fn match_strategy(&self) -> MatchStrategy<'_> {
        MatchStrategy::Mapped(self.mappings())
    }
}

impl Filterable for Network {
    fn match_strategy(&self) -> MatchStrategy<'_> {
        MatchStrategy::Direct {
            account: self.provider_account_id(),
            location: self.location(),
        }
    }
}

impl Filterable for Machine {
    fn match_strategy(&self) -> MatchStrategy<'_> {
        MatchStrategy::Direct {
            account: self.provider_account_id(),
            location: self.location(),
        }
    }
}

/// Mapping lookup for a catalog resource. Always `None` for resources that
/// are not published through mappings.
pub fn mapping_for<'a, R: Filterable + ?Sized>(
    resource: &'a R,
    account: &ResourceId,
    location: &LocationConstraint,
) -> Option<&'a ProviderMapping> {
    match resource.match_strategy() {
        MatchStrategy::Mapped(mappings) => find_mapping(mappings, account, location),
        MatchStrategy::Direct { .. } => None,
    }
}

/// Nothing is compatible with an unset location.
pub fn is_compatible<R: Filterable + ?Sized>(resource: &R, selection: &Selection) -> bool {
    let Some(constraint) = selection.location() else {
        return false;
    };

    match resource.match_strategy() {
        MatchStrategy::Mapped(mappings) => find_mapping(mappings, selection.account(), constraint).is_some(),
        MatchStrategy::Direct { account, location } => {
            account == selection.account() && location.matches_constraint(constraint)
        }
    }
}

/// Keep the compatible resources, in source order.
pub fn filter_compatible<R: Filterable + Clone>(all: &[R], selection: &Selection) -> Vec<R> {
    all.iter().filter(|r| is_compatible(*r, selection)).cloned().collect()
}

pub fn filter_images(all: &[MachineImage], selection: &Selection) -> Vec<MachineImage> {
    filter_compatible(all, selection)
}

/// Compatible configurations, smallest first. This is the only list that
/// gets re-ordered; the sort is stable.
pub fn filter_and_sort_configurations(
    all: &[MachineConfiguration],
    selection: &Selection,
) -> Vec<MachineConfiguration> {
    let mut configs = filter_compatible(all, selection);
    configs.sort();
    configs
}

pub fn filter_networks(all: &[Network], selection: &Selection) -> Vec<Network> {
    filter_compatible(all, selection)
}

pub fn filter_host_machines(all: &[Machine], selection: &Selection) -> Vec<Machine> {
    filter_compatible(all, selection)
}
