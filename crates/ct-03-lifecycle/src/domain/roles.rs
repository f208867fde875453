//! Role manager.
//!
//! Knows which role each implementation serves, the shorthand element names
//! used in container configuration and the default implementation per role.
//!
//! ## Configuration Format
//!
//! ```text
//! <roles>
//!   <role name="citadel.demo.Logger" shorthand="logger" default-class="demo.Console">
//!     <component shorthand="console-logger" class="demo.Console"/>
//!     <component shorthand="file-logger" class="demo.File"
//!                configuration-schema="file.schema">
//!       <dependency role="citadel.demo.Clock"/>
//!       <context-entry key="home"/>
//!     </component>
//!   </role>
//! </roles>
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use shared_types::{ComponentInfo, Configuration, ConfigurationError, Construction, Role, TypeKey};
use thiserror::Error;
use tracing::debug;

use crate::ports::RoleResolver;

/// Errors building a role manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("implementation {implementation} already serves role '{existing}'")]
    DuplicateImplementation {
        implementation: TypeKey,
        existing: Role,
    },

    #[error("shorthand '{shorthand}' is already bound to {existing}")]
    DuplicateShorthand {
        shorthand: String,
        existing: TypeKey,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// One implementation of a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    role: Role,
    implementation: TypeKey,
    shorthand: String,
    info: ComponentInfo,
}

impl RoleEntry {
    /// Entry whose declared services default to its own role.
    pub fn new(
        role: impl Into<Role>,
        implementation: impl Into<TypeKey>,
        shorthand: impl Into<String>,
    ) -> Self {
        let role = role.into();
        Self {
            info: ComponentInfo::new().service(role.clone()),
            role,
            implementation: implementation.into(),
            shorthand: shorthand.into(),
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: ComponentInfo) -> Self {
        self.info = info;
        self
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn implementation(&self) -> &TypeKey {
        &self.implementation
    }

    pub fn shorthand(&self) -> &str {
        &self.shorthand
    }

    pub fn info(&self) -> &ComponentInfo {
        &self.info
    }
}

/// Lookup tables over all known role entries.
#[derive(Debug, Clone, Default)]
pub struct RoleManager {
    by_implementation: HashMap<TypeKey, Arc<RoleEntry>>,
    by_shorthand: HashMap<String, Arc<RoleEntry>>,
    defaults: HashMap<Role, TypeKey>,
    parent: Option<Arc<RoleManager>>,
}

impl RoleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager that falls back to `parent` for unknown keys.
    pub fn with_parent(parent: Arc<RoleManager>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn register(&mut self, entry: RoleEntry) -> Result<(), RoleError> {
        if let Some(existing) = self.by_implementation.get(entry.implementation()) {
            return Err(RoleError::DuplicateImplementation {
                implementation: entry.implementation().clone(),
                existing: existing.role().clone(),
            });
        }
        if let Some(existing) = self.by_shorthand.get(entry.shorthand()) {
            return Err(RoleError::DuplicateShorthand {
                shorthand: entry.shorthand().to_string(),
                existing: existing.implementation().clone(),
            });
        }

        debug!(
            role = %entry.role(),
            implementation = %entry.implementation(),
            shorthand = entry.shorthand(),
            "[RoleManager] registered implementation"
        );
        let entry = Arc::new(entry);
        self.by_shorthand
            .insert(entry.shorthand().to_string(), Arc::clone(&entry));
        self.by_implementation
            .insert(entry.implementation().clone(), entry);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_entry(mut self, entry: RoleEntry) -> Result<Self, RoleError> {
        self.register(entry)?;
        Ok(self)
    }

    pub fn set_default(&mut self, role: Role, implementation: TypeKey) {
        self.defaults.insert(role, implementation);
    }

    pub fn for_implementation(&self, implementation: &TypeKey) -> Option<Arc<RoleEntry>> {
        self.by_implementation
            .get(implementation)
            .cloned()
            .or_else(|| self.parent.as_ref()?.for_implementation(implementation))
    }

    pub fn for_shorthand(&self, shorthand: &str) -> Option<Arc<RoleEntry>> {
        self.by_shorthand
            .get(shorthand)
            .cloned()
            .or_else(|| self.parent.as_ref()?.for_shorthand(shorthand))
    }

    pub fn default_implementation(&self, role: &Role) -> Option<TypeKey> {
        self.defaults
            .get(role)
            .cloned()
            .or_else(|| self.parent.as_ref()?.default_implementation(role))
    }

    /// Roles known to this manager (parent excluded), sorted.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .by_implementation
            .values()
            .map(|entry| entry.role().clone())
            .collect();
        roles.sort();
        roles.dedup();
        roles
    }

    pub fn len(&self) -> usize {
        self.by_implementation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_implementation.is_empty()
    }

    /// Load `<role>` elements from a roles configuration.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, RoleError> {
        let mut manager = Self::new();
        for role_config in configuration.children_named("role") {
            let role = Role::new(role_config.attribute("name")?);

            for component in role_config.children_named("component") {
                let entry = RoleEntry::new(
                    role.clone(),
                    component.attribute("class")?,
                    component.attribute("shorthand")?,
                )
                .with_info(component_info(&role, component)?);
                manager.register(entry)?;
            }

            if let Some(default_class) = role_config.attributes.get("default-class") {
                let default_class = TypeKey::new(default_class.as_str());
                if let Some(shorthand) = role_config.attributes.get("shorthand") {
                    if manager.for_implementation(&default_class).is_none() {
                        manager.register(RoleEntry::new(
                            role.clone(),
                            default_class.clone(),
                            shorthand.as_str(),
                        ))?;
                    } else if !manager.by_shorthand.contains_key(shorthand) {
                        if let Some(entry) = manager.by_implementation.get(&default_class) {
                            manager
                                .by_shorthand
                                .insert(shorthand.clone(), Arc::clone(entry));
                        }
                    }
                }
                manager.set_default(role.clone(), default_class);
            }
        }
        Ok(manager)
    }
}

fn component_info(role: &Role, component: &Configuration) -> Result<ComponentInfo, RoleError> {
    let mut info = ComponentInfo::new().service(role.clone());
    for dependency in component.children_named("dependency") {
        info = info.dependency(dependency.attribute("role")?);
    }
    for entry in component.children_named("context-entry") {
        info = info.context_entry(entry.attribute("key")?);
    }
    if let Some(schema) = component.attributes.get("configuration-schema") {
        info = info.configuration_schema(schema.as_str());
    }
    if let Some(schema) = component.attributes.get("parameters-schema") {
        info = info.parameters_schema(schema.as_str());
    }
    if component.attribute_or("construction", "direct") == "factory" {
        info.construction = Construction::Factory;
    }
    Ok(info)
}

impl RoleResolver for RoleManager {
    fn role_for(&self, implementation: &TypeKey) -> Option<Arc<RoleEntry>> {
        self.for_implementation(implementation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles_config() -> Configuration {
        Configuration::new("roles").with_child(
            Configuration::new("role")
                .with_attribute("name", "demo.Logger")
                .with_attribute("shorthand", "logger")
                .with_attribute("default-class", "demo.Console")
                .with_child(
                    Configuration::new("component")
                        .with_attribute("shorthand", "console-logger")
                        .with_attribute("class", "demo.Console"),
                )
                .with_child(
                    Configuration::new("component")
                        .with_attribute("shorthand", "file-logger")
                        .with_attribute("class", "demo.File")
                        .with_attribute("configuration-schema", "file.schema")
                        .with_child(
                            Configuration::new("dependency").with_attribute("role", "demo.Clock"),
                        ),
                ),
        )
    }

    #[test]
    fn test_from_configuration() {
        let manager = RoleManager::from_configuration(&roles_config()).unwrap();

        let file = manager.for_shorthand("file-logger").unwrap();
        assert_eq!(file.role(), &Role::new("demo.Logger"));
        assert_eq!(file.info().dependencies, vec![Role::new("demo.Clock")]);
        assert!(file.info().configuration_schema.is_some());

        let by_role_shorthand = manager.for_shorthand("logger").unwrap();
        assert_eq!(by_role_shorthand.implementation(), &TypeKey::new("demo.Console"));
        assert_eq!(
            manager.default_implementation(&Role::new("demo.Logger")),
            Some(TypeKey::new("demo.Console"))
        );
        assert_eq!(manager.roles(), vec![Role::new("demo.Logger")]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut manager = RoleManager::new();
        manager
            .register(RoleEntry::new("demo.Logger", "demo.Console", "console"))
            .unwrap();

        assert!(matches!(
            manager.register(RoleEntry::new("demo.Other", "demo.Console", "other")),
            Err(RoleError::DuplicateImplementation { .. })
        ));
        assert!(matches!(
            manager.register(RoleEntry::new("demo.Logger", "demo.File", "console")),
            Err(RoleError::DuplicateShorthand { .. })
        ));
    }

    #[test]
    fn test_parent_fallback() {
        let parent = RoleManager::new()
            .with_entry(RoleEntry::new("demo.Logger", "demo.Console", "console"))
            .unwrap();
        let child = RoleManager::with_parent(Arc::new(parent));

        assert!(child.role_for(&TypeKey::new("demo.Console")).is_some());
        assert!(child.for_shorthand("console").is_some());
        assert!(child.role_for(&TypeKey::new("demo.Missing")).is_none());
        assert!(child.is_empty());
    }

    #[test]
    fn test_missing_attribute_is_error() {
        let config = Configuration::new("roles").with_child(Configuration::new("role"));
        assert!(matches!(
            RoleManager::from_configuration(&config),
            Err(RoleError::Configuration(_))
        ));
    }
}
