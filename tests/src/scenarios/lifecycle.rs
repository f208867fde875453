//! # Lifecycle Scenarios
//!
//! Bulk initialization with failure aggregation, best-effort disposal and
//! build-once lazy materialization under contention.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    use container_runtime::{Container, ContainerConfig, ContainerError};
    use ct_03_lifecycle::{FailureKind, HandlerState, TokioCommandQueue};
    use shared_types::ComponentInstance;

    use crate::fixtures::{
        widget_catalog, widget_container, widget_role, widget_roles, WidgetCounters, WidgetSpec,
    };

    fn states(container: &Container) -> Vec<HandlerState> {
        container.status().iter().map(|row| row.state).collect()
    }

    fn five_with_third_failing(config: ContainerConfig) {
        let (container, counters) = widget_container(config);
        for index in 0..5 {
            let mut widget = WidgetSpec::new(format!("widget-{index}"));
            if index == 2 {
                widget = widget.failing_initialize();
            }
            container.add_component(widget.metadata()).unwrap();
        }

        let error = container.initialize().unwrap_err();

        let composite = match error {
            ContainerError::Composite(composite) => composite,
            other => panic!("expected a composite failure, got {other}"),
        };
        assert_eq!(composite.len(), 1);
        assert_eq!(composite.failures()[0].hint, "widget-2");
        assert!(matches!(composite.failures()[0].kind, FailureKind::Prepare(_)));

        let prepared = states(&container)
            .iter()
            .filter(|state| **state == HandlerState::Prepared)
            .count();
        assert_eq!(prepared, 4);
        assert_eq!(counters.initializations(), 5);
    }

    #[test]
    fn test_five_eager_one_failing_inline() {
        five_with_third_failing(ContainerConfig::default());
    }

    #[test]
    fn test_five_eager_one_failing_on_worker_pool() {
        five_with_third_failing(ContainerConfig::default().with_worker_threads(Some(3)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_eager_preparation_on_tokio_blocking_pool() {
        let counters = Arc::new(WidgetCounters::default());
        let container = Container::builder(ContainerConfig::default())
            .queue(Arc::new(TokioCommandQueue::current().unwrap()))
            .catalog(widget_catalog(&counters))
            .roles(Arc::new(widget_roles()))
            .build()
            .unwrap();
        for index in 0..4 {
            container
                .add_component(WidgetSpec::new(format!("widget-{index}")).metadata())
                .unwrap();
        }

        tokio::task::block_in_place(|| container.initialize()).unwrap();

        assert_eq!(counters.initializations(), 4);
        assert!(states(&container)
            .iter()
            .all(|state| *state == HandlerState::Prepared));
    }

    #[test]
    fn test_slow_preparation_is_reported_as_timeout() {
        let (container, _) = widget_container(
            ContainerConfig::default()
                .with_worker_threads(Some(2))
                .with_prepare_timeout(Some(Duration::from_millis(50))),
        );
        container
            .add_component(WidgetSpec::new("quick").metadata())
            .unwrap();
        container
            .add_component(
                WidgetSpec::new("slow")
                    .delayed(Duration::from_millis(500))
                    .metadata(),
            )
            .unwrap();

        let error = container.initialize().unwrap_err();

        let ContainerError::Composite(composite) = error else {
            panic!("expected a composite failure");
        };
        assert_eq!(composite.len(), 1);
        assert_eq!(composite.failures()[0].hint, "slow");
        assert!(matches!(
            composite.failures()[0].kind,
            FailureKind::TimedOut(_)
        ));
    }

    // =========================================================================
    // DISPOSAL
    // =========================================================================

    #[test]
    fn test_dispose_visits_every_handler_despite_failure() {
        let (container, counters) = widget_container(ContainerConfig::default());
        for index in 0..5 {
            let mut widget = WidgetSpec::new(format!("widget-{index}"));
            if index == 2 {
                widget = widget.failing_dispose();
            }
            container.add_component(widget.metadata()).unwrap();
        }
        container.initialize().unwrap();

        let summary = container.dispose();

        assert_eq!(counters.disposals(), 5);
        assert_eq!(summary.attempted(), 5);
        assert_eq!(summary.failed, 1);
        assert!(states(&container)
            .iter()
            .all(|state| *state == HandlerState::Disposed));

        // Disposed handlers refuse to materialize again.
        let error = container.resolve(&widget_role(), Some("widget-0")).unwrap_err();
        assert!(matches!(error, ContainerError::Handler(_)));
    }

    #[test]
    fn test_lazy_components_are_not_built_by_initialize() {
        let (container, counters) = widget_container(ContainerConfig::default());
        container
            .add_component(WidgetSpec::new("lazy").lazy().metadata())
            .unwrap();

        container.initialize().unwrap();
        assert_eq!(counters.constructions(), 0);

        container.resolve(&widget_role(), Some("lazy")).unwrap();
        assert_eq!(counters.constructions(), 1);
        assert_eq!(container.metrics().lazy_materializations, 1);
    }

    // =========================================================================
    // CONCURRENT LAZY LOOKUP
    // =========================================================================

    #[test]
    fn test_concurrent_first_lookups_construct_once() {
        const THREADS: usize = 8;
        let (container, counters) = widget_container(ContainerConfig::default());
        container
            .add_component(
                WidgetSpec::new("shared")
                    .lazy()
                    .delayed(Duration::from_millis(20))
                    .metadata(),
            )
            .unwrap();
        let container = Arc::new(container);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let container = Arc::clone(&container);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    container.resolve(&widget_role(), None).unwrap()
                })
            })
            .collect();
        let instances: Vec<ComponentInstance> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(counters.constructions(), 1);
        assert_eq!(instances.len(), THREADS);
        assert!(instances
            .iter()
            .all(|instance| std::ptr::addr_eq(Arc::as_ptr(instance), Arc::as_ptr(&instances[0]))));
    }
}
