//! Verification of declared component metadata against loaded types.

use std::sync::Arc;

use shared_types::{Capability, ComponentInfo, TypeDescriptor, TypeKey, TypeResolver};
use tracing::debug;

use super::structural::{violation, StructuralVerifier};
use crate::domain::VerifyRule;
use crate::error::VerifyError;

/// Loads the declared implementation and services through a
/// [`TypeResolver`], runs the structural checks and then rejects any
/// declaration the implementation has no capability to consume.
pub struct MetadataVerifier {
    resolver: Arc<dyn TypeResolver>,
    structural: StructuralVerifier,
}

impl MetadataVerifier {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self {
            resolver,
            structural: StructuralVerifier::new(),
        }
    }

    pub fn verify_type(
        &self,
        hint: &str,
        implementation: &TypeKey,
        info: &ComponentInfo,
    ) -> Result<(), VerifyError> {
        let class = self.load(hint, implementation)?;
        let services = info
            .services
            .iter()
            .map(|role| self.load(hint, &role.type_key()))
            .collect::<Result<Vec<_>, _>>()?;

        self.structural
            .verify_component(hint, &class, &services, info.is_buildable())?;

        self.verify_dependencies_present(hint, &class, info)?;
        self.verify_context_present(hint, &class, info)?;
        self.verify_configuration_present(hint, &class, info)?;
        self.verify_parameters_present(hint, &class, info)?;

        debug!(
            component = hint,
            implementation = %implementation,
            services = services.len(),
            "[Verifier] component verified"
        );
        Ok(())
    }

    fn load(&self, hint: &str, key: &TypeKey) -> Result<Arc<TypeDescriptor>, VerifyError> {
        self.resolver
            .load_type(key)
            .map_err(|source| VerifyError::TypeNotFound {
                component: hint.to_string(),
                source,
            })
    }

    /// Declared dependencies need a way to receive them.
    pub fn verify_dependencies_present(
        &self,
        hint: &str,
        class: &TypeDescriptor,
        info: &ComponentInfo,
    ) -> Result<(), VerifyError> {
        let can_receive = class.has_capability(Capability::DependencyPull)
            || class.has_capability(Capability::DependencyInjection);
        if !info.dependencies.is_empty() && !can_receive {
            return Err(violation(
                hint,
                class,
                VerifyRule::UnneededDependencies,
                format!(
                    "declares {} dependencies but cannot receive them",
                    info.dependencies.len()
                ),
            ));
        }
        Ok(())
    }

    pub fn verify_context_present(
        &self,
        hint: &str,
        class: &TypeDescriptor,
        info: &ComponentInfo,
    ) -> Result<(), VerifyError> {
        if !info.context_entries.is_empty() && !class.has_capability(Capability::Contextualizable) {
            return Err(violation(
                hint,
                class,
                VerifyRule::UnneededContextEntries,
                format!(
                    "declares {} context entries but is not contextualizable",
                    info.context_entries.len()
                ),
            ));
        }
        Ok(())
    }

    pub fn verify_configuration_present(
        &self,
        hint: &str,
        class: &TypeDescriptor,
        info: &ComponentInfo,
    ) -> Result<(), VerifyError> {
        if info.configuration_schema.is_some() && !class.has_capability(Capability::Configurable) {
            return Err(violation(
                hint,
                class,
                VerifyRule::UnneededConfigurationSchema,
                "declares a configuration schema but is not configurable",
            ));
        }
        Ok(())
    }

    pub fn verify_parameters_present(
        &self,
        hint: &str,
        class: &TypeDescriptor,
        info: &ComponentInfo,
    ) -> Result<(), VerifyError> {
        if info.parameters_schema.is_some() && !class.has_capability(Capability::Parameterizable) {
            return Err(violation(
                hint,
                class,
                VerifyRule::UnneededParametersSchema,
                "declares a parameters schema but is not parameterizable",
            ));
        }
        Ok(())
    }
}
