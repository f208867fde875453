//! # Core Domain Entities
//!
//! Identifiers and metadata describing a component inside the container.
//!
//! ## Clusters
//!
//! - **Naming**: `Role`, `TypeKey`, `HintKey`
//! - **Registration**: `ComponentMetadata`, `Activation`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;
use crate::errors::{ConfigurationError, ReservedHint};

/// Textual sentinel of a role's default entry.
pub const DEFAULT_ENTRY: &str = "*";

/// Textual sentinel of a role's selector entry.
pub const SELECTOR_ENTRY: &str = "$";

/// Configuration attribute marking a component as its role's default.
pub const DEFAULT_ATTRIBUTE: &str = "default";

/// Returns `true` when `hint` collides with a reserved entry name.
#[must_use]
pub fn is_reserved_hint(hint: &str) -> bool {
    hint == DEFAULT_ENTRY || hint == SELECTOR_ENTRY
}

// =============================================================================
// NAMING
// =============================================================================

/// Stable name of a capability contract.
///
/// The role name doubles as the [`TypeKey`] of the role's own
/// interface-shaped type in the type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the interface type backing this role.
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        TypeKey::new(self.0.clone())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Opaque identifier of a registered type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Create a type key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&Role> for TypeKey {
    fn from(role: &Role) -> Self {
        role.type_key()
    }
}

/// Key of one entry in a role's hint map.
///
/// `Default` and `Selector` are produced by the container only. User hints
/// always arrive as `Named`, and [`HintKey::named`] refuses the reserved
/// sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HintKey {
    Default,
    Selector,
    Named(String),
}

impl HintKey {
    /// Build a user hint, rejecting `"*"` and `"$"`.
    pub fn named(hint: impl Into<String>) -> Result<Self, ReservedHint> {
        let hint = hint.into();
        if is_reserved_hint(&hint) {
            return Err(ReservedHint(hint));
        }
        Ok(Self::Named(hint))
    }

    /// Map raw text onto a key, sentinels included.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            DEFAULT_ENTRY => Self::Default,
            SELECTOR_ENTRY => Self::Selector,
            other => Self::Named(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => DEFAULT_ENTRY,
            Self::Selector => SELECTOR_ENTRY,
            Self::Named(hint) => hint,
        }
    }

    #[must_use]
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Named(_))
    }
}

impl fmt::Display for HintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

/// When a component is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Built on first lookup.
    Lazy,
    /// Built during `initialize()`.
    #[default]
    Eager,
}

impl Activation {
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy)
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lazy => f.write_str("lazy"),
            Self::Eager => f.write_str("eager"),
        }
    }
}

impl FromStr for Activation {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lazy" | "request" => Ok(Self::Lazy),
            "eager" | "startup" | "background" | "inline" => Ok(Self::Eager),
            _ => Err(ConfigurationError::InvalidValue {
                element: "component".to_string(),
                attribute: "activation".to_string(),
                value: raw.to_string(),
                expected: "lazy or eager",
            }),
        }
    }
}

/// Everything the container needs to register one component.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMetadata {
    hint: String,
    implementation: TypeKey,
    configuration: Configuration,
    activation: Activation,
}

impl ComponentMetadata {
    pub fn new(
        hint: impl Into<String>,
        implementation: impl Into<TypeKey>,
        configuration: Configuration,
        activation: Activation,
    ) -> Self {
        Self {
            hint: hint.into(),
            implementation: implementation.into(),
            configuration,
            activation,
        }
    }

    /// Metadata with an empty configuration named after the hint.
    pub fn simple(
        hint: impl Into<String>,
        implementation: impl Into<TypeKey>,
        activation: Activation,
    ) -> Self {
        let hint = hint.into();
        let configuration = Configuration::new(hint.clone());
        Self::new(hint, implementation, configuration, activation)
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn implementation(&self) -> &TypeKey {
        &self.implementation
    }

    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.activation.is_lazy()
    }

    /// Whether the configuration carries `default="true"`.
    ///
    /// Malformed values count as `false`.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.configuration
            .attribute_as_bool(DEFAULT_ATTRIBUTE, false)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_hints_cannot_be_named() {
        assert!(HintKey::named(DEFAULT_ENTRY).is_err());
        assert!(HintKey::named(SELECTOR_ENTRY).is_err());
        assert_eq!(
            HintKey::named("console").unwrap(),
            HintKey::Named("console".to_string())
        );
    }

    #[test]
    fn test_parse_maps_sentinels() {
        assert_eq!(HintKey::parse("*"), HintKey::Default);
        assert_eq!(HintKey::parse("$"), HintKey::Selector);
        assert!(!HintKey::parse("file").is_reserved());
        assert_eq!(HintKey::Selector.to_string(), "$");
    }

    #[test]
    fn test_activation_parsing() {
        assert_eq!("lazy".parse::<Activation>().unwrap(), Activation::Lazy);
        assert_eq!("STARTUP".parse::<Activation>().unwrap(), Activation::Eager);
        assert_eq!("background".parse::<Activation>().unwrap(), Activation::Eager);
        assert!("sometimes".parse::<Activation>().is_err());
    }

    #[test]
    fn test_metadata_default_flag() {
        let config = Configuration::new("console").with_attribute("default", "true");
        let metadata = ComponentMetadata::new("console", "demo.Console", config, Activation::Lazy);
        assert!(metadata.is_default());
        assert!(metadata.is_lazy());

        let plain = ComponentMetadata::simple("file", "demo.File", Activation::Eager);
        assert!(!plain.is_default());

        let garbled = Configuration::new("x").with_attribute("default", "maybe");
        let metadata = ComponentMetadata::new("x", "demo.X", garbled, Activation::Eager);
        assert!(!metadata.is_default());
    }

    #[test]
    fn test_role_type_key() {
        let role = Role::new("citadel.demo.Logger");
        assert_eq!(role.type_key(), TypeKey::new("citadel.demo.Logger"));
        assert_eq!(role.to_string(), "citadel.demo.Logger");
    }
}
