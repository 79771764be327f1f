use serde::{Deserialize, Serialize};
use std::fmt;

/// Token naming a location the operator wants the machine in, e.g. a
/// country name ("France") or a location code ("FR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationConstraint(String);

impl LocationConstraint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationConstraint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Physical location of a provider region, network or machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    country_code: String,
    country_name: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

#[allow(unused)]
impl Location {
    pub fn new(country_code: impl Into<String>, country_name: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            country_name: country_name.into(),
            region: None,
            city: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// ISO 3166-1 code
    /// eg. FR
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// The constraint the operator picks to target this location.
    pub fn constraint(&self) -> LocationConstraint {
        LocationConstraint::new(self.country_name.clone())
    }

    /// A location satisfies a constraint when the constraint names any level
    /// of it: country code, country name, region or city. Comparison ignores
    /// ASCII case.
    pub fn matches_constraint(&self, constraint: &LocationConstraint) -> bool {
        let wanted = constraint.as_str().trim();
        if wanted.is_empty() {
            return false;
        }

        [
            Some(self.country_code.as_str()),
            Some(self.country_name.as_str()),
            self.region.as_deref(),
            self.city.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|level| level.eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.city, &self.region) {
            (Some(city), _) => write!(f, "{city}, {}", self.country_name),
            (None, Some(region)) => write!(f, "{region}, {}", self.country_name),
            (None, None) => f.write_str(&self.country_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_every_location_level() {
        let paris = Location::new("FR", "France").with_region("Ile-de-France").with_city("Paris");

        assert!(paris.matches_constraint(&"FR".into()));
        assert!(paris.matches_constraint(&"france".into()));
        assert!(paris.matches_constraint(&"Ile-de-France".into()));
        assert!(paris.matches_constraint(&"PARIS".into()));
        assert!(!paris.matches_constraint(&"Germany".into()));
        assert!(!paris.matches_constraint(&"".into()));
    }

    #[test]
    fn test_constraint_is_country_name() {
        let berlin = Location::new("DE", "Germany").with_city("Berlin");
        assert_eq!(berlin.constraint(), LocationConstraint::new("Germany"));
        assert_eq!(berlin.to_string(), "Berlin, Germany");
    }
}
