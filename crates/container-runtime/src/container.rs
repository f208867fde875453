//! # Container
//!
//! The facade applications talk to. A [`Container`] owns one lifecycle
//! orchestrator and adds configuration, optional metadata verification,
//! typed resolution, Prometheus counters and a status report on top.
//!
//! ## Startup Sequence
//!
//! ```text
//! ContainerBuilder::build()   validate config, pick queue and factory
//!         │
//! add_component() × N         register handlers, nothing is constructed
//!         │
//! initialize()                prepare eager components, aggregate failures
//!         │
//! resolve() / component()     materialize lazy components on first use
//!         │
//! dispose()                   tear down in registration order
//! ```

use std::any::type_name;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use citadel_telemetry::{
    metric_inc, outcome, HistogramTimer, COMPONENTS_LIVE, COMPONENTS_REGISTERED, DISPOSALS,
    INITIALIZE_DURATION, PREPARATIONS, REGISTRATION_FAILURES,
};
use ct_01_handler_registry::Resolved;
use ct_03_lifecycle::{
    CommandQueue, DefaultObjectFactory, DisposalSummary, HandlerEntry, HandlerState,
    LifecycleExtension, LifecycleExtensions, LifecycleMetricsSnapshot, LifecycleOrchestrator,
    ObjectFactory, RayonCommandQueue, RoleManager, RoleResolver, TypeCatalog,
};
use shared_types::{
    downcast_instance, Activation, Component, ComponentInstance, ComponentMetadata, Context,
    ResourceManagers, Role, ServiceLocator, TypeKey, TypeResolver, DEFAULT_ENTRY,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::admission::VerifierAdmission;
use crate::config::ContainerConfig;
use crate::error::ContainerError;

// =============================================================================
// BUILDER
// =============================================================================

/// Assembles a [`Container`].
pub struct ContainerBuilder {
    config: ContainerConfig,
    catalog: Arc<TypeCatalog>,
    roles: Arc<RoleManager>,
    factory: Option<Arc<dyn ObjectFactory>>,
    queue: Option<Arc<dyn CommandQueue>>,
    context: Context,
    resources: ResourceManagers,
    extensions: LifecycleExtensions,
}

impl ContainerBuilder {
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(TypeCatalog::new()),
            roles: Arc::new(RoleManager::new()),
            factory: None,
            queue: None,
            context: Context::new(),
            resources: ResourceManagers::new(),
            extensions: LifecycleExtensions::new(),
        }
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: Arc<RoleManager>) -> Self {
        self.roles = roles;
        self
    }

    /// Replace the catalog-backed default factory.
    #[must_use]
    pub fn factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Prepare eager components on `queue`. Takes precedence over
    /// `worker_threads`.
    #[must_use]
    pub fn queue(mut self, queue: Arc<dyn CommandQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn resources(mut self, resources: ResourceManagers) -> Self {
        self.resources = resources;
        self
    }

    #[must_use]
    pub fn extension(mut self, extension: Arc<dyn LifecycleExtension>) -> Self {
        self.extensions.add(extension);
        self
    }

    /// Validate the configuration and wire the orchestrator.
    pub fn build(self) -> Result<Container, ContainerError> {
        self.config.validate()?;

        let queue = match (self.queue, self.config.worker_threads) {
            (Some(queue), _) => Some(queue),
            (None, Some(threads)) => {
                Some(Arc::new(RayonCommandQueue::new(threads)?) as Arc<dyn CommandQueue>)
            }
            (None, None) => None,
        };
        let factory = self.factory.unwrap_or_else(|| {
            Arc::new(DefaultObjectFactory::new(Arc::clone(&self.catalog))) as Arc<dyn ObjectFactory>
        });
        let types: Arc<dyn TypeResolver> = Arc::clone(&self.catalog) as Arc<dyn TypeResolver>;
        let roles: Arc<dyn RoleResolver> = Arc::clone(&self.roles) as Arc<dyn RoleResolver>;

        let mut builder = LifecycleOrchestrator::builder(roles, Arc::clone(&types), factory)
            .context(self.context)
            .resources(self.resources)
            .extensions(self.extensions);
        let queued = queue.is_some();
        if let Some(queue) = queue {
            builder = builder.queue(queue);
        }
        if self.config.verify_components {
            builder = builder.admission(Arc::new(VerifierAdmission::new(types)));
        }
        if let Some(timeout) = self.config.prepare_timeout {
            builder = builder.prepare_timeout(timeout);
        }

        info!(
            container = %self.config.name,
            verify = self.config.verify_components,
            queued,
            types = self.catalog.len(),
            roles = self.roles.len(),
            "[Container] built"
        );

        Ok(Container {
            config: self.config,
            catalog: self.catalog,
            roles: self.roles,
            orchestrator: builder.build(),
            published: AtomicUsize::new(0),
        })
    }
}

// =============================================================================
// CONTAINER
// =============================================================================

/// One row of [`Container::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStatus {
    pub index: usize,
    pub id: Uuid,
    pub role: Role,
    pub hint: String,
    pub implementation: TypeKey,
    pub activation: Activation,
    pub state: HandlerState,
}

/// Component container.
pub struct Container {
    config: ContainerConfig,
    catalog: Arc<TypeCatalog>,
    roles: Arc<RoleManager>,
    orchestrator: LifecycleOrchestrator,
    /// Components counted in the live gauge by this container.
    published: AtomicUsize,
}

impl Container {
    pub fn builder(config: ContainerConfig) -> ContainerBuilder {
        ContainerBuilder::new(config)
    }

    /// Register one component.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for reserved, duplicate or conflicting-default hints
    /// - `RoleNotFound` when no role lists the implementation
    /// - `HandlerCreation` when verification, type resolution or wiring fails
    pub fn add_component(&self, metadata: ComponentMetadata) -> Result<(), ContainerError> {
        match self.orchestrator.add_component(metadata) {
            Ok(()) => {
                metric_inc!(COMPONENTS_REGISTERED);
                Ok(())
            }
            Err(error) => {
                metric_inc!(REGISTRATION_FAILURES);
                Err(error.into())
            }
        }
    }

    /// Resolve the handler entry, or the selector of a role with several
    /// implementations when no hint is given.
    ///
    /// Nothing is constructed: a lazy component stays `Wired` until
    /// [`resolve`](Self::resolve), [`component`](Self::component) or
    /// [`HandlerEntry::resolve`] materializes it.
    pub fn lookup(
        &self,
        role: &Role,
        hint: Option<&str>,
    ) -> Result<Resolved<Arc<HandlerEntry>>, ContainerError> {
        Ok(self.orchestrator.lookup(role, hint)?)
    }

    pub fn has(&self, role: &Role, hint: Option<&str>) -> bool {
        self.orchestrator.has(role, hint)
    }

    /// Look up and materialize a component.
    pub fn resolve(&self, role: &Role, hint: Option<&str>) -> Result<ComponentInstance, ContainerError> {
        match self.lookup(role, hint)? {
            Resolved::Handler(entry) => Ok(entry.resolve()?),
            Resolved::Selector(selector) => Err(ContainerError::SelectorRequiresHint {
                role: role.clone(),
                hints: selector.hints(),
            }),
        }
    }

    /// Typed [`resolve`](Self::resolve).
    pub fn component<T: Component>(
        &self,
        role: &Role,
        hint: Option<&str>,
    ) -> Result<Arc<T>, ContainerError> {
        let instance = self.resolve(role, hint)?;
        downcast_instance::<T>(&instance).ok_or_else(|| ContainerError::TypeMismatch {
            role: role.clone(),
            hint: hint.unwrap_or(DEFAULT_ENTRY).to_string(),
            expected: type_name::<T>(),
        })
    }

    /// Prepare every eager component.
    ///
    /// # Errors
    ///
    /// `Composite` listing every component that failed, in registration
    /// order. Components that prepared successfully stay prepared.
    #[instrument(skip(self), fields(container = %self.config.name))]
    pub fn initialize(&self) -> Result<(), ContainerError> {
        let _timer = HistogramTimer::new(&INITIALIZE_DURATION);
        let eager = self
            .orchestrator
            .entries()
            .iter()
            .filter(|entry| !entry.metadata().is_lazy())
            .count();

        let result = self.orchestrator.initialize();
        let failed = result.as_ref().err().map_or(0, |composite| composite.len());

        PREPARATIONS
            .with_label_values(&[outcome(true)])
            .inc_by(eager.saturating_sub(failed) as f64);
        PREPARATIONS
            .with_label_values(&[outcome(false)])
            .inc_by(failed as f64);

        let prepared = self.count_in(HandlerState::Prepared);
        let previous = self.published.swap(prepared, Ordering::AcqRel);
        COMPONENTS_LIVE.add(prepared as f64 - previous as f64);

        info!(eager, failed, prepared, "[Container] initialization finished");
        Ok(result?)
    }

    /// Dispose every component. Failures are logged and counted, never
    /// returned.
    #[instrument(skip(self), fields(container = %self.config.name))]
    pub fn dispose(&self) -> DisposalSummary {
        let summary = self.orchestrator.dispose();

        DISPOSALS
            .with_label_values(&[outcome(true)])
            .inc_by(summary.disposed as f64);
        DISPOSALS
            .with_label_values(&[outcome(false)])
            .inc_by(summary.failed as f64);
        COMPONENTS_LIVE.sub(self.published.swap(0, Ordering::AcqRel) as f64);

        summary
    }

    /// One row per registered component, in registration order.
    pub fn status(&self) -> Vec<ComponentStatus> {
        self.orchestrator
            .entries()
            .iter()
            .map(|entry| ComponentStatus {
                index: entry.index(),
                id: entry.id(),
                role: entry.role().clone(),
                hint: entry.hint().to_string(),
                implementation: entry.implementation().clone(),
                activation: entry.metadata().activation(),
                state: entry.state(),
            })
            .collect()
    }

    /// Log the status report.
    pub fn print_status(&self) {
        info!("===========================================");
        info!("  CONTAINER STATUS: {}", self.config.name);
        info!("===========================================");

        for row in self.status() {
            let icon = match row.state {
                HandlerState::Prepared => "✅",
                HandlerState::Wired => "⏳",
                HandlerState::New => "❔",
                HandlerState::Disposed => "⏹️ ",
            };
            let lazy_marker = if row.activation.is_lazy() { " [LAZY]" } else { "" };
            info!(
                "  {} #{:<3} {:30} {:12} {}{}",
                icon,
                row.index,
                row.role.as_str(),
                row.hint,
                row.state,
                lazy_marker
            );
        }

        let metrics = self.metrics();
        info!(
            "  registered={} constructions={} failed={} lazy={}",
            metrics.components_registered,
            metrics.constructions,
            metrics.preparation_failures,
            metrics.lazy_materializations
        );
        info!("===========================================");
    }

    pub fn metrics(&self) -> LifecycleMetricsSnapshot {
        self.orchestrator.metrics().snapshot()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn roles(&self) -> &Arc<RoleManager> {
        &self.roles
    }

    pub fn orchestrator(&self) -> &LifecycleOrchestrator {
        &self.orchestrator
    }

    /// Locator handed to components; also usable by the embedding code.
    pub fn locator(&self) -> Arc<dyn ServiceLocator> {
        self.orchestrator.locator()
    }

    pub fn len(&self) -> usize {
        self.orchestrator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orchestrator.is_empty()
    }

    fn count_in(&self, state: HandlerState) -> usize {
        self.orchestrator
            .entries()
            .iter()
            .filter(|entry| entry.state() == state)
            .count()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.config.name)
            .field("components", &self.len())
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}
