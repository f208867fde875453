//! # Verifier Scenarios
//!
//! Class shape, lifecycle compatibility and surplus-declaration rules, both
//! on the verifiers directly and through container admission.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use container_runtime::{Container, ContainerConfig};
    use ct_02_component_verifier::{MetadataVerifier, StructuralVerifier, VerifyError, VerifyRule};
    use ct_03_lifecycle::{RoleEntry, TypeCatalog};
    use shared_types::{
        Activation, Capability, Component, ComponentInfo, ComponentMetadata, ConstructorAccess,
        Role, TypeDescriptor,
    };

    use crate::fixtures::{widget_roles, Widget, WidgetCounters, WIDGET_ROLE};

    fn rule_of(result: Result<(), VerifyError>) -> Option<VerifyRule> {
        result.err().and_then(|error| error.rule())
    }

    // =========================================================================
    // CLASS SHAPE
    // =========================================================================

    #[test]
    fn test_each_class_defect_is_distinguishable() {
        let verifier = StructuralVerifier::new();
        let cases = [
            (
                TypeDescriptor::class("demo.Abstract").abstract_type(),
                VerifyRule::AbstractClass,
            ),
            (
                TypeDescriptor::class("demo.NoCtor").with_constructor(ConstructorAccess::Missing),
                VerifyRule::MissingNoArgConstructor,
            ),
            (
                TypeDescriptor::class("demo.HiddenCtor")
                    .with_constructor(ConstructorAccess::Restricted),
                VerifyRule::NonPublicConstructor,
            ),
            (
                TypeDescriptor::class("demo.Hidden").restricted(),
                VerifyRule::NonPublicClass,
            ),
            (
                TypeDescriptor::role(&Role::new("demo.Logger"))
                    .with_constructor(ConstructorAccess::Public),
                VerifyRule::InterfaceClass,
            ),
        ];

        for (class, expected) in cases {
            assert_eq!(
                rule_of(verifier.verify_class("x", &class)),
                Some(expected),
                "{}",
                class.key()
            );
        }
        assert!(verifier
            .verify_class("ok", &TypeDescriptor::class("demo.Fine"))
            .is_ok());
    }

    // =========================================================================
    // LIFECYCLE COMPATIBILITY
    // =========================================================================

    #[test]
    fn test_pull_and_injection_are_exclusive() {
        let verifier = StructuralVerifier::new();
        let both = TypeDescriptor::class("demo.Both").with_capabilities([
            Capability::DependencyPull,
            Capability::DependencyInjection,
        ]);
        assert_eq!(
            rule_of(verifier.verify_lifecycle_compatibility("x", &both)),
            Some(VerifyRule::IncompatibleDependencyCapabilities)
        );

        for capabilities in [
            vec![],
            vec![Capability::DependencyPull],
            vec![Capability::DependencyInjection],
        ] {
            let class = TypeDescriptor::class("demo.One").with_capabilities(capabilities);
            assert!(verifier.verify_lifecycle_compatibility("x", &class).is_ok());
        }
    }

    // =========================================================================
    // DEPENDENCY PRESENCE
    // =========================================================================

    #[test]
    fn test_dependency_presence() {
        let catalog = Arc::new(TypeCatalog::new());
        catalog
            .register_type(TypeDescriptor::class("demo.Plain"))
            .unwrap();
        let verifier = MetadataVerifier::new(catalog);
        let plain = TypeDescriptor::class("demo.Plain");
        let pull = TypeDescriptor::class("demo.Pull").with_capability(Capability::DependencyPull);

        let one_dependency = ComponentInfo::new().dependency("demo.Clock");
        let none = ComponentInfo::new();

        assert_eq!(
            rule_of(verifier.verify_dependencies_present("x", &plain, &one_dependency)),
            Some(VerifyRule::UnneededDependencies)
        );
        assert!(verifier
            .verify_dependencies_present("x", &pull, &one_dependency)
            .is_ok());
        assert!(verifier.verify_dependencies_present("x", &plain, &none).is_ok());
    }

    // =========================================================================
    // ADMISSION THROUGH THE CONTAINER
    // =========================================================================

    #[test]
    fn test_container_rejects_undeclared_configuration_capability() {
        let counters = Arc::new(WidgetCounters::default());
        let catalog = Arc::new(TypeCatalog::new());
        let sloppy = "citadel.test.SloppyWidget";
        catalog
            .register_role(&Role::new(WIDGET_ROLE))
            .unwrap()
            .register_component(
                TypeDescriptor::class(sloppy).implements(WIDGET_ROLE),
                move || Box::new(Widget::new(Arc::clone(&counters))) as Box<dyn Component>,
            )
            .unwrap();
        let mut roles = widget_roles();
        roles
            .register(RoleEntry::new(WIDGET_ROLE, sloppy, "sloppy").with_info(
                ComponentInfo::new()
                    .service(WIDGET_ROLE)
                    .configuration_schema("citadel.test.sloppy"),
            ))
            .unwrap();

        let container = Container::builder(ContainerConfig::default())
            .catalog(catalog)
            .roles(Arc::new(roles))
            .build()
            .unwrap();

        let error = container
            .add_component(ComponentMetadata::simple("sloppy", sloppy, Activation::Eager))
            .unwrap_err();

        assert_eq!(
            error.verify_error().and_then(VerifyError::rule),
            Some(VerifyRule::UnneededConfigurationSchema)
        );
        assert!(container.is_empty());
    }
}
