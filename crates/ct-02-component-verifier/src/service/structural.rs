//! Structural checks on type descriptors.

use std::sync::Arc;

use shared_types::{Capability, ConstructorAccess, TypeDescriptor, TypeKind};
use tracing::warn;

use crate::domain::VerifyRule;
use crate::error::VerifyError;

/// Pairs of capabilities a single implementation may not combine.
const INCOMPATIBLE_PAIRS: [(Capability, Capability, VerifyRule); 2] = [
    (
        Capability::DependencyPull,
        Capability::DependencyInjection,
        VerifyRule::IncompatibleDependencyCapabilities,
    ),
    (
        Capability::Configurable,
        Capability::Parameterizable,
        VerifyRule::IncompatibleConfigurationCapabilities,
    ),
];

/// Stateless verifier of component and service shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralVerifier;

impl StructuralVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Full check of one component. The class shape is only checked when the
    /// container constructs the implementation itself.
    pub fn verify_component(
        &self,
        name: &str,
        implementation: &TypeDescriptor,
        services: &[Arc<TypeDescriptor>],
        buildable: bool,
    ) -> Result<(), VerifyError> {
        if buildable {
            self.verify_class(name, implementation)?;
        }
        self.verify_lifecycle_compatibility(name, implementation)?;
        self.verify_services(name, services)?;
        self.verify_implements_services(name, implementation, services)
    }

    /// Class shape. Rules are evaluated in a fixed order and the first
    /// violation is reported.
    pub fn verify_class(&self, name: &str, class: &TypeDescriptor) -> Result<(), VerifyError> {
        match class.constructor() {
            ConstructorAccess::Public => {}
            ConstructorAccess::Missing => {
                return Err(violation(
                    name,
                    class,
                    VerifyRule::MissingNoArgConstructor,
                    "no zero-argument constructor",
                ))
            }
            ConstructorAccess::Restricted => {
                return Err(violation(
                    name,
                    class,
                    VerifyRule::NonPublicConstructor,
                    "zero-argument constructor is not public",
                ))
            }
        }
        if class.is_abstract() {
            return Err(violation(name, class, VerifyRule::AbstractClass, "type is abstract"));
        }
        let kind_rule = match class.kind() {
            TypeKind::Class => None,
            TypeKind::Array => Some(VerifyRule::ArrayClass),
            TypeKind::Interface => Some(VerifyRule::InterfaceClass),
            TypeKind::Primitive => Some(VerifyRule::PrimitiveClass),
        };
        if let Some(rule) = kind_rule {
            return Err(violation(
                name,
                class,
                rule,
                format!("{:?} types cannot be instantiated", class.kind()),
            ));
        }
        if !class.is_public() {
            return Err(violation(name, class, VerifyRule::NonPublicClass, "type is not public"));
        }
        Ok(())
    }

    pub fn verify_lifecycle_compatibility(
        &self,
        name: &str,
        implementation: &TypeDescriptor,
    ) -> Result<(), VerifyError> {
        let capabilities = implementation.capabilities();
        for (first, second, rule) in INCOMPATIBLE_PAIRS {
            if capabilities.contains_all(&[first, second]) {
                return Err(violation(
                    name,
                    implementation,
                    rule,
                    format!("declares both {first} and {second}"),
                ));
            }
        }
        Ok(())
    }

    pub fn verify_services(
        &self,
        name: &str,
        services: &[Arc<TypeDescriptor>],
    ) -> Result<(), VerifyError> {
        services
            .iter()
            .try_for_each(|service| self.verify_service(name, service))
    }

    /// A role must be a public interface without lifecycle capabilities.
    pub fn verify_service(&self, name: &str, service: &TypeDescriptor) -> Result<(), VerifyError> {
        if service.kind() != TypeKind::Interface {
            return Err(violation(
                name,
                service,
                VerifyRule::ServiceNotInterface,
                "service is not interface-shaped",
            ));
        }
        if !service.is_public() {
            return Err(violation(
                name,
                service,
                VerifyRule::ServiceNotPublic,
                "service is not public",
            ));
        }
        if let Some(capability) = service.capabilities().iter().next() {
            return Err(violation(
                name,
                service,
                VerifyRule::ServiceIsLifecycle,
                format!("service carries lifecycle capability {capability}"),
            ));
        }
        Ok(())
    }

    pub fn verify_implements_services(
        &self,
        name: &str,
        implementation: &TypeDescriptor,
        services: &[Arc<TypeDescriptor>],
    ) -> Result<(), VerifyError> {
        match services
            .iter()
            .find(|service| !implementation.is_assignable_to(service.key()))
        {
            Some(service) => Err(violation(
                name,
                implementation,
                VerifyRule::ServiceNotImplemented,
                format!("does not implement service {}", service.key()),
            )),
            None => Ok(()),
        }
    }
}

pub(crate) fn violation(
    name: &str,
    subject: &TypeDescriptor,
    rule: VerifyRule,
    detail: impl Into<String>,
) -> VerifyError {
    let detail = detail.into();
    warn!(
        component = name,
        type_key = %subject.key(),
        rule = rule.code(),
        "[Verifier] {}",
        detail
    );
    VerifyError::Violation {
        component: name.to_string(),
        type_key: subject.key().clone(),
        rule,
        detail,
    }
}
