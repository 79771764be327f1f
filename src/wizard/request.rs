use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use super::{NicList, WizardError};
use crate::cloud::{LocationConstraint, ResourceId};
use crate::compat::CompatibleResources;

fn machine_name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("invalid machine name regex"))
}

/// Check a machine name before it goes into a request. Surrounding
/// whitespace is ignored.
pub(crate) fn validate_machine_name(name: &str) -> Result<(), WizardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WizardError::InvalidRequest("machine name is required".to_string()));
    }
    if !machine_name_regex().is_match(name) {
        return Err(WizardError::InvalidRequest(format!(
            "machine name '{name}' may only contain letters, digits, '.', '_' and '-'"
        )));
    }
    Ok(())
}

/// Placement constraint as understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementConstraint {
    Affinity,
    AntiAffinity,
}

/// Placement rule offered to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementRule {
    #[default]
    None,
    Affinity,
    AntiAffinity,
}

impl PlacementRule {
    pub const ALL: [PlacementRule; 3] = [PlacementRule::None, PlacementRule::Affinity, PlacementRule::AntiAffinity];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementRule::None => "NONE",
            PlacementRule::Affinity => "AFFINITY",
            PlacementRule::AntiAffinity => "ANTI AFFINITY",
        }
    }

    pub fn constraint(&self) -> Option<PlacementConstraint> {
        match self {
            PlacementRule::None => None,
            PlacementRule::Affinity => Some(PlacementConstraint::Affinity),
            PlacementRule::AntiAffinity => Some(PlacementConstraint::AntiAffinity),
        }
    }
}

impl fmt::Display for PlacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds the new machine to (or away from) a set of existing machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementHint {
    placement_constraint: PlacementConstraint,
    machine_ids: Vec<ResourceId>,
}

#[allow(unused)]
impl PlacementHint {
    pub fn placement_constraint(&self) -> PlacementConstraint {
        self.placement_constraint
    }

    pub fn machine_ids(&self) -> &[ResourceId] {
        &self.machine_ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    network_id: ResourceId,
}

impl NetworkInterface {
    pub fn network_id(&self) -> &ResourceId {
        &self.network_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineTemplate {
    machine_config_id: ResourceId,
    machine_image_id: ResourceId,
    #[serde(default)]
    network_interfaces: Vec<NetworkInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credential_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placement_hint: Option<PlacementHint>,
}

#[allow(unused)]
impl MachineTemplate {
    pub fn machine_config_id(&self) -> &ResourceId {
        &self.machine_config_id
    }

    pub fn machine_image_id(&self) -> &ResourceId {
        &self.machine_image_id
    }

    pub fn network_interfaces(&self) -> &[NetworkInterface] {
        &self.network_interfaces
    }

    pub fn credential_id(&self) -> Option<&ResourceId> {
        self.credential_id.as_ref()
    }

    pub fn user_data(&self) -> Option<&str> {
        self.user_data.as_deref()
    }

    pub fn placement_hint(&self) -> Option<&PlacementHint> {
        self.placement_hint.as_ref()
    }
}

/// Immutable machine creation request, assembled once at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineCreate {
    provider_account_id: ResourceId,
    location: LocationConstraint,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    machine_template: MachineTemplate,
}

#[allow(unused)]
impl MachineCreate {
    pub fn provider_account_id(&self) -> &ResourceId {
        &self.provider_account_id
    }

    pub fn location(&self) -> &LocationConstraint {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn machine_template(&self) -> &MachineTemplate {
        &self.machine_template
    }
}

/// Collects the operator's choices across the wizard steps.
#[derive(Debug, Clone, Default)]
pub struct MachineCreateBuilder {
    name: String,
    description: String,
    properties: BTreeMap<String, String>,
    image: Option<ResourceId>,
    config: Option<ResourceId>,
    nics: NicList,
    credential: Option<ResourceId>,
    user_data: String,
    placement_rule: PlacementRule,
    placement_members: Vec<ResourceId>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

#[allow(unused)]
impl MachineCreateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn set_image(&mut self, image: Option<ResourceId>) -> &mut Self {
        self.image = image;
        self
    }

    pub fn set_config(&mut self, config: Option<ResourceId>) -> &mut Self {
        self.config = config;
        self
    }

    pub fn set_credential(&mut self, credential: Option<ResourceId>) -> &mut Self {
        self.credential = credential;
        self
    }

    pub fn set_user_data(&mut self, user_data: impl Into<String>) -> &mut Self {
        self.user_data = user_data.into();
        self
    }

    pub fn set_placement(&mut self, rule: PlacementRule, members: Vec<ResourceId>) -> &mut Self {
        self.placement_rule = rule;
        self.placement_members = members;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> Option<&ResourceId> {
        self.image.as_ref()
    }

    pub fn config(&self) -> Option<&ResourceId> {
        self.config.as_ref()
    }

    pub fn credential(&self) -> Option<&ResourceId> {
        self.credential.as_ref()
    }

    pub fn user_data(&self) -> &str {
        &self.user_data
    }

    pub fn placement_rule(&self) -> PlacementRule {
        self.placement_rule
    }

    pub fn nics(&self) -> &NicList {
        &self.nics
    }

    pub fn nics_mut(&mut self) -> &mut NicList {
        &mut self.nics
    }

    /// Forget every choice that depends on the account/location pair.
    pub fn reset_provider_specific(&mut self) {
        self.image = None;
        self.config = None;
        self.nics.clear();
        self.placement_members.clear();
    }

    /// Validate the choices against the resources currently offered and
    /// produce the request.
    pub fn build(&self, offered: &CompatibleResources) -> Result<MachineCreate, WizardError> {
        let selection = offered.selection();
        let location = selection
            .location()
            .cloned()
            .ok_or_else(|| WizardError::InvalidRequest("no location selected".to_string()))?;

        validate_machine_name(&self.name)?;
        let name = self.name.trim();

        let image = self
            .image
            .as_ref()
            .ok_or_else(|| WizardError::InvalidRequest("no image selected".to_string()))?;
        if offered.image(image).is_none() {
            return Err(WizardError::InvalidRequest(format!(
                "image {image} is not available for this account and location"
            )));
        }

        let config = self
            .config
            .as_ref()
            .ok_or_else(|| WizardError::InvalidRequest("no hardware configuration selected".to_string()))?;
        if offered.configuration(config).is_none() {
            return Err(WizardError::InvalidRequest(format!(
                "hardware configuration {config} is not available for this account and location"
            )));
        }

        let mut network_interfaces = Vec::with_capacity(self.nics.len());
        for network_id in self.nics.ids() {
            if offered.network(network_id).is_none() {
                return Err(WizardError::InvalidRequest(format!(
                    "network {network_id} is not available for this account and location"
                )));
            }
            network_interfaces.push(NetworkInterface {
                network_id: network_id.clone(),
            });
        }

        let placement_hint = match self.placement_rule.constraint() {
            None => None,
            Some(placement_constraint) => {
                if self.placement_members.is_empty() {
                    return Err(WizardError::InvalidRequest(format!(
                        "placement rule {} needs at least one member machine",
                        self.placement_rule
                    )));
                }
                if let Some(unknown) = self.placement_members.iter().find(|id| offered.host_machine(id).is_none()) {
                    return Err(WizardError::InvalidRequest(format!(
                        "machine {unknown} cannot be used in a placement rule for this account and location"
                    )));
                }
                Some(PlacementHint {
                    placement_constraint,
                    machine_ids: self.placement_members.clone(),
                })
            }
        };

        Ok(MachineCreate {
            provider_account_id: selection.account().clone(),
            location,
            name: name.to_string(),
            description: non_empty(&self.description),
            properties: self.properties.clone(),
            machine_template: MachineTemplate {
                machine_config_id: config.clone(),
                machine_image_id: image.clone(),
                network_interfaces,
                credential_id: self.credential.clone(),
                user_data: non_empty(&self.user_data),
                placement_hint,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CatalogBackend;
    use crate::compat::{Selection, refresh};
    use crate::testing::sample_catalog;

    async fn offered() -> CompatibleResources {
        let backend = CatalogBackend::new(sample_catalog());
        refresh(&backend, &Selection::new("acc-ovh", Some("France".into())), true).await
    }

    fn valid_builder(offered: &CompatibleResources) -> MachineCreateBuilder {
        let mut builder = MachineCreateBuilder::new();
        builder
            .set_name("web-2")
            .set_image(Some("img-ubuntu".into()))
            .set_config(Some("cfg-small".into()));
        let public = offered.network(&"net-public".into()).cloned().unwrap();
        builder.nics_mut().push(public);
        builder
    }

    #[tokio::test]
    async fn test_build_minimal_request() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);
        builder.set_description("   ").set_user_data("");

        let request = builder.build(&offered).unwrap();

        assert_eq!(request.provider_account_id().as_str(), "acc-ovh");
        assert_eq!(request.location().as_str(), "France");
        assert_eq!(request.name(), "web-2");
        assert_eq!(request.description(), None);
        let template = request.machine_template();
        assert_eq!(template.machine_image_id().as_str(), "img-ubuntu");
        assert_eq!(template.machine_config_id().as_str(), "cfg-small");
        assert_eq!(template.network_interfaces().len(), 1);
        assert_eq!(template.user_data(), None);
        assert_eq!(template.placement_hint(), None);
    }

    #[tokio::test]
    async fn test_build_keeps_description_and_user_data() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);
        builder
            .set_description("frontend")
            .set_user_data("#cloud-config\n")
            .set_credential(Some("key-laptop".into()));

        let request = builder.build(&offered).unwrap();

        assert_eq!(request.description(), Some("frontend"));
        assert_eq!(request.machine_template().user_data(), Some("#cloud-config\n"));
        assert_eq!(request.machine_template().credential_id().map(ResourceId::as_str), Some("key-laptop"));
    }

    #[tokio::test]
    async fn test_build_rejects_image_not_offered() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);
        builder.set_image(Some("img-windows".into()));

        let err = builder.build(&offered).unwrap_err();

        assert!(matches!(err, WizardError::InvalidRequest(msg) if msg.contains("img-windows")));
    }

    #[tokio::test]
    async fn test_build_rejects_bad_name() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);

        builder.set_name("");
        assert!(builder.build(&offered).is_err());
        builder.set_name("web 2");
        assert!(builder.build(&offered).is_err());
        builder.set_name("  web-2  ");
        assert_eq!(builder.build(&offered).unwrap().name(), "web-2");
    }

    #[test]
    fn test_validate_machine_name() {
        assert!(validate_machine_name("web-2").is_ok());
        assert!(validate_machine_name("db_1.internal").is_ok());
        assert!(validate_machine_name(" api ").is_ok());

        assert!(matches!(validate_machine_name("   "), Err(WizardError::InvalidRequest(_))));
        assert!(matches!(validate_machine_name("web 2"), Err(WizardError::InvalidRequest(_))));
        assert!(matches!(validate_machine_name("-web"), Err(WizardError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_build_without_location_fails() {
        let builder = valid_builder(&offered().await);
        let unset = CompatibleResources::empty(Selection::new("acc-ovh", None));

        assert!(matches!(builder.build(&unset), Err(WizardError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_placement_none_yields_no_hint() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);
        builder.set_placement(PlacementRule::None, vec!["m-web-1".into()]);

        let request = builder.build(&offered).unwrap();

        assert!(request.machine_template().placement_hint().is_none());
    }

    #[tokio::test]
    async fn test_affinity_carries_member_ids() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);
        builder.set_placement(PlacementRule::AntiAffinity, vec!["m-web-1".into()]);

        let request = builder.build(&offered).unwrap();

        let hint = request.machine_template().placement_hint().unwrap();
        assert_eq!(hint.placement_constraint(), PlacementConstraint::AntiAffinity);
        assert_eq!(hint.machine_ids(), &[ResourceId::from("m-web-1")]);
    }

    #[tokio::test]
    async fn test_affinity_rejects_foreign_machine() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);
        builder.set_placement(PlacementRule::Affinity, vec!["m-app-1".into()]);

        assert!(builder.build(&offered).is_err());

        builder.set_placement(PlacementRule::Affinity, Vec::new());
        assert!(builder.build(&offered).is_err());
    }

    #[tokio::test]
    async fn test_reset_provider_specific_clears_choices() {
        let offered = offered().await;
        let mut builder = valid_builder(&offered);

        builder.reset_provider_specific();

        assert!(builder.image().is_none());
        assert!(builder.config().is_none());
        assert!(builder.nics().is_empty());
        assert_eq!(builder.name(), "web-2");
    }

    #[test]
    fn test_request_serializes_backend_field_names() {
        let hint = PlacementHint {
            placement_constraint: PlacementConstraint::AntiAffinity,
            machine_ids: vec!["m1".into()],
        };
        let json = serde_json::to_value(&hint).unwrap();
        assert_eq!(json["placement_constraint"], "ANTI_AFFINITY");
        assert_eq!(json["machine_ids"][0], "m1");
    }
}
