//! # Registry Scenarios
//!
//! Role/hint resolution through the container: selectors, implicit and
//! explicit defaults, reserved hints.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use container_runtime::demo::{self, ConsoleLogger, FileLogger};
    use container_runtime::{Container, ContainerConfig, ContainerError};
    use ct_03_lifecycle::TypeCatalog;
    use proptest::prelude::*;
    use shared_types::{Activation, ComponentMetadata, Configuration, Role};

    use crate::fixtures::{widget_container, widget_role, WidgetSpec};

    fn logger_container() -> Container {
        let catalog = Arc::new(TypeCatalog::new());
        demo::register_types(&catalog).unwrap();
        Container::builder(ContainerConfig::default())
            .catalog(catalog)
            .roles(Arc::new(demo::role_manager().unwrap()))
            .build()
            .unwrap()
    }

    fn logger(hint: &str, implementation: &str, default: bool) -> ComponentMetadata {
        let mut configuration = Configuration::new(hint);
        if default {
            configuration = configuration.with_attribute("default", "true");
        }
        if implementation == demo::FILE_LOGGER {
            let path = std::env::temp_dir().join(format!("citadel-scenario-{hint}.log"));
            configuration = configuration.with_attribute("path", path.display().to_string());
        }
        ComponentMetadata::new(hint, implementation, configuration, Activation::Lazy)
    }

    // =========================================================================
    // LOGGER ROLE: console (default) + file
    // =========================================================================

    #[test]
    fn test_logger_console_default_and_file() {
        // Arrange
        let container = logger_container();
        container
            .add_component(logger("console", demo::CONSOLE_LOGGER, true))
            .unwrap();
        container
            .add_component(logger("file", demo::FILE_LOGGER, false))
            .unwrap();
        let role = Role::new(demo::LOGGER_ROLE);

        // Act
        let default = container.lookup(&role, None).unwrap();
        let file = container.lookup(&role, Some("file")).unwrap();

        // Assert
        assert!(default.is_selector());
        let console_entry = default.into_effective_handler().unwrap();
        assert_eq!(console_entry.hint(), "console");
        assert!(container
            .component::<ConsoleLogger>(&role, Some("console"))
            .is_ok());

        assert_eq!(file.handler().unwrap().hint(), "file");
        assert!(container.component::<FileLogger>(&role, Some("file")).is_ok());

        assert!(!container.has(&role, Some("network")));
        assert!(container.has(&role, None));
    }

    #[test]
    fn test_explicit_default_wins_regardless_of_order() {
        let container = logger_container();
        let role = Role::new(demo::LOGGER_ROLE);
        container
            .add_component(logger("first", demo::CONSOLE_LOGGER, false))
            .unwrap();
        container
            .add_component(logger("file", demo::FILE_LOGGER, true))
            .unwrap();

        let default = container
            .lookup(&role, None)
            .unwrap()
            .into_effective_handler()
            .unwrap();
        assert_eq!(default.hint(), "file");
    }

    #[test]
    fn test_second_explicit_default_is_invalid() {
        let (container, _) = widget_container(ContainerConfig::default());
        container
            .add_component(WidgetSpec::new("a").default_hint().metadata())
            .unwrap();

        let error = container
            .add_component(WidgetSpec::new("b").default_hint().metadata())
            .unwrap_err();

        assert!(error.is_invalid_argument());
        assert!(error.to_string().starts_with("invalid argument"));
        assert!(!container.has(&widget_role(), Some("b")));
    }

    #[test]
    fn test_missing_role_is_not_found() {
        let container = logger_container();
        let error = container
            .lookup(&Role::new("citadel.demo.Printer"), None)
            .unwrap_err();
        assert!(matches!(error, ContainerError::NotFound { .. }));
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    fn hint_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set("[a-z][a-z0-9-]{0,11}", 1..6)
            .prop_map(|hints| hints.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_several_hints_resolve_to_selector(hints in hint_strategy()) {
            let (container, _) = widget_container(ContainerConfig::default());
            for hint in &hints {
                container.add_component(WidgetSpec::new(hint.as_str()).lazy().metadata()).unwrap();
            }

            let resolved = container.lookup(&widget_role(), None).unwrap();
            prop_assert!(container.has(&widget_role(), None));
            if hints.len() > 1 {
                let selector = resolved.selector().unwrap();
                prop_assert_eq!(selector.hints(), hints.clone());
                // Without an explicit default the first registration is the default.
                let default = selector.default_handler().unwrap();
                prop_assert_eq!(default.hint(), hints[0].as_str());
            } else {
                prop_assert_eq!(resolved.handler().unwrap().hint(), hints[0].as_str());
            }
        }

        #[test]
        fn prop_reserved_hints_always_rejected(
            hints in hint_strategy(),
            reserved in prop::sample::select(vec!["*", "$"]),
        ) {
            let (container, _) = widget_container(ContainerConfig::default());
            for hint in &hints {
                container.add_component(WidgetSpec::new(hint.as_str()).lazy().metadata()).unwrap();
            }

            let error = container
                .add_component(WidgetSpec::new(reserved).lazy().metadata())
                .unwrap_err();
            prop_assert!(error.is_invalid_argument());
            prop_assert_eq!(container.len(), hints.len());
        }
    }
}
