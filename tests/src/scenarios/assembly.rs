//! # Assembly Scenarios
//!
//! The demo flow: roles and components described as JSON configuration
//! trees, assembled into a container, initialized, used and disposed.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use container_runtime::demo::{self, ConsoleLogger, Greeter, LogSink};
    use container_runtime::{assemble, load_configuration, Container, ContainerConfig};
    use ct_03_lifecycle::{HandlerState, TypeCatalog};
    use shared_types::Role;

    fn demo_container(config: ContainerConfig) -> Container {
        let catalog = Arc::new(TypeCatalog::new());
        demo::register_types(&catalog).unwrap();
        Container::builder(config)
            .catalog(catalog)
            .roles(Arc::new(demo::role_manager().unwrap()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_embedded_demo_runs_end_to_end() {
        let container = demo_container(ContainerConfig::default().with_worker_threads(Some(2)));
        let report = assemble(&container, &demo::container_configuration().unwrap());
        assert!(report.is_clean());

        container.initialize().unwrap();
        let greeter = container
            .component::<Greeter>(&Role::new(demo::GREETER_ROLE), None)
            .unwrap();
        assert_eq!(greeter.greet("world").unwrap(), "Hello, world!");

        let console = container
            .component::<ConsoleLogger>(&Role::new(demo::LOGGER_ROLE), Some("console"))
            .unwrap();
        assert_eq!(console.lines_written(), 1);

        // The file logger is lazy and nobody asked for it.
        let file_row = container
            .status()
            .into_iter()
            .find(|row| row.hint == "file")
            .unwrap();
        assert_eq!(file_row.state, HandlerState::Wired);

        let summary = container.dispose();
        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_configuration_file_with_component_elements() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("greetings.log");
        let document = serde_json::json!({
            "name": "container",
            "children": [
                {
                    "name": "component",
                    "attributes": {
                        "id": "disk",
                        "class": demo::FILE_LOGGER,
                        "path": log.display().to_string()
                    }
                },
                {
                    "name": "component",
                    "attributes": { "id": "hello", "class": demo::GREETER },
                    "children": [
                        { "name": "parameter", "attributes": { "name": "greeting", "value": "Salve" } }
                    ]
                },
                { "name": "printer", "attributes": { "id": "nope" } }
            ]
        });
        let path = dir.path().join("container.json");
        std::fs::write(&path, document.to_string()).unwrap();

        let container = demo_container(ContainerConfig::default());
        let report = assemble(&container, &load_configuration(&path).unwrap());

        assert_eq!(report.registered, vec!["disk", "hello"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].element, "printer");

        // One logger registered: the greeter's hint-less pull gets it.
        container.initialize().unwrap();
        let greeter = container
            .component::<Greeter>(&Role::new(demo::GREETER_ROLE), Some("hello"))
            .unwrap();
        greeter.greet("Marcus").unwrap();

        let disk = container
            .resolve(&Role::new(demo::LOGGER_ROLE), Some("disk"))
            .unwrap();
        assert_eq!(demo::as_sink(&disk).unwrap().lines_written(), 1);

        container.dispose();
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "Salve, Marcus!\n");
    }
}
