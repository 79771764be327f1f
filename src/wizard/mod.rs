//! Machine creation wizard: the session state behind the steps, the request
//! it assembles, and the interactive terminal flow.

mod interactive;
mod nics;
mod request;

pub use interactive::run;
pub use nics::NicList;
pub use request::{
    MachineCreate, MachineCreateBuilder, MachineTemplate, NetworkInterface, PlacementConstraint, PlacementHint,
    PlacementRule,
};

use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{BackendError, CloudManager};
use crate::cloud::{Credentials, Job, LocationConstraint, ProviderAccount, ResourceId};
use crate::compat::{CompatibleResources, Selection, refresh};
use crate::settings::Settings;

#[derive(thiserror::Error, Debug)]
pub enum WizardError {
    #[error("No providers: first add cloud providers")]
    NoProviders,
    #[error("provider account {0} has no location")]
    NoLocations(ResourceId),
    #[error("unknown provider account {0}")]
    UnknownAccount(ResourceId),
    #[error("wizard cancelled")]
    Cancelled,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("failed to retrieve provider accounts: {0}")]
    Accounts(#[source] BackendError),
    #[error("instance creation failure: {0}")]
    Submission(#[source] BackendError),
}

/// State of one wizard session.
///
/// The offered resources are always the snapshot of the latest selection;
/// choosing another account or location throws the previous one away along
/// with every choice that depended on it.
pub struct Wizard<'a> {
    backend: &'a dyn CloudManager,
    settings: &'a Settings,
    accounts: Vec<ProviderAccount>,
    credentials: Vec<Credentials>,
    notices: Vec<String>,
    offered: Option<Arc<CompatibleResources>>,
    builder: MachineCreateBuilder,
}

impl<'a> Wizard<'a> {
    /// Load what does not depend on the selection: the tenant's provider
    /// accounts and key pairs. A tenant without provider accounts cannot
    /// create machines.
    pub async fn init(backend: &'a dyn CloudManager, settings: &'a Settings) -> Result<Self, WizardError> {
        let accounts = backend
            .provider_accounts(settings.tenant_id())
            .await
            .map_err(WizardError::Accounts)?;
        if accounts.is_empty() {
            return Err(WizardError::NoProviders);
        }

        let mut notices = Vec::new();
        let credentials = backend.credentials().await.unwrap_or_else(|err| {
            warn!("failed to retrieve key pairs: {err}");
            notices.push(format!("failed to retrieve key pairs: {err}"));
            Vec::new()
        });

        info!(
            tenant = settings.tenant_id(),
            accounts = accounts.len(),
            key_pairs = credentials.len(),
            "wizard initialized"
        );

        Ok(Self {
            backend,
            settings,
            accounts,
            credentials,
            notices,
            offered: None,
            builder: MachineCreateBuilder::new(),
        })
    }

    pub fn accounts(&self) -> &[ProviderAccount] {
        &self.accounts
    }

    pub fn account(&self, id: &ResourceId) -> Option<&ProviderAccount> {
        self.accounts.iter().find(|a| a.id() == id)
    }

    pub fn credentials(&self) -> &[Credentials] {
        &self.credentials
    }

    /// Location constraints offered for an account, one per provider
    /// location, without duplicates.
    pub fn locations(&self, account: &ResourceId) -> Result<Vec<LocationConstraint>, WizardError> {
        let account = self
            .account(account)
            .ok_or_else(|| WizardError::UnknownAccount(account.clone()))?;

        let mut constraints: Vec<LocationConstraint> = Vec::new();
        for location in account.provider().locations() {
            let constraint = location.constraint();
            if !constraints.contains(&constraint) {
                constraints.push(constraint);
            }
        }

        if constraints.is_empty() {
            return Err(WizardError::NoLocations(account.id().clone()));
        }
        Ok(constraints)
    }

    /// Apply a new (account, location) selection: refetch and refilter every
    /// candidate list and drop the choices made under the previous one.
    pub async fn select(&mut self, selection: Selection) -> Result<Arc<CompatibleResources>, WizardError> {
        if self.account(selection.account()).is_none() {
            return Err(WizardError::UnknownAccount(selection.account().clone()));
        }

        let snapshot = refresh(self.backend, &selection, self.settings.host_placement()).await;
        self.notices.extend(snapshot.notices().iter().map(|n| n.to_string()));
        self.builder.reset_provider_specific();

        let snapshot = Arc::new(snapshot);
        self.offered = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Snapshot of the current selection. Shared so the steps can read it
    /// while they update the builder.
    pub fn offered(&self) -> Option<Arc<CompatibleResources>> {
        self.offered.clone()
    }

    /// Notices gathered since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn builder(&self) -> &MachineCreateBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut MachineCreateBuilder {
        &mut self.builder
    }

    pub fn build_request(&self) -> Result<MachineCreate, WizardError> {
        let offered = self
            .offered
            .as_ref()
            .ok_or_else(|| WizardError::InvalidRequest("no provider account selected".to_string()))?;
        self.builder.build(offered)
    }

    /// Submit the request. Failure ends the session; nothing is retried.
    pub async fn submit(&self, request: &MachineCreate) -> Result<Job, WizardError> {
        info!(
            account = %request.provider_account_id(),
            location = %request.location(),
            name = request.name(),
            "submitting machine creation request"
        );

        let job = self
            .backend
            .create_machine(request)
            .await
            .map_err(WizardError::Submission)?;

        info!(job = %job.id(), status = %job.status(), "machine creation job accepted");
        Ok(job)
    }
}
