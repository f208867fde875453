//! # Lifecycle Orchestrator
//!
//! Turns component metadata into wired handlers, registers them by role and
//! hint, prepares the eager ones during `initialize()` and tears everything
//! down in `dispose()`.
//!
//! ## Registration
//!
//! `add_component` is all-or-nothing per component: a failure at any step
//! discards the partial handler and leaves earlier registrations untouched.
//!
//! ## Initialization
//!
//! Eager handlers are prepared through the command queue when one is
//! configured, otherwise on the caller's thread. Every failure is collected
//! and reported together as a [`CompositeFailure`].

use std::sync::Arc;
use std::time::Duration;

use ct_01_handler_registry::{HandlerDirectory, RegistryError, Resolved};
use parking_lot::RwLock;
use shared_types::{
    is_reserved_hint, ComponentMetadata, Context, ResourceManagers, Role, ServiceLocator,
    TypeResolver, CONTEXT_HINT, CONTEXT_ROLE,
};
use tracing::{debug, info, warn};

use super::commands::{prepare_entry, PrepareHandlerCommand};
use super::locator::{EntryRegistry, RegistryLocator};
use crate::domain::{
    CompletionLatch, ComponentHandler, CompositeFailure, FailureCollector, FailureKind,
    HandlerEntry, LifecycleExtensions, PreparationFailure,
};
use crate::error::{CreationCause, OrchestratorError};
use crate::metrics::LifecycleMetrics;
use crate::ports::{AdmissionCheck, CommandQueue, CreationContext, ObjectFactory, RoleResolver};

// =============================================================================
// BUILDER
// =============================================================================

/// Assembles a [`LifecycleOrchestrator`].
pub struct OrchestratorBuilder {
    roles: Arc<dyn RoleResolver>,
    types: Arc<dyn TypeResolver>,
    factory: Arc<dyn ObjectFactory>,
    queue: Option<Arc<dyn CommandQueue>>,
    admission: Option<Arc<dyn AdmissionCheck>>,
    context: Context,
    resources: ResourceManagers,
    extensions: LifecycleExtensions,
    prepare_timeout: Option<Duration>,
    metrics: Option<Arc<LifecycleMetrics>>,
}

impl OrchestratorBuilder {
    /// Run eager preparation on `queue` instead of the calling thread.
    #[must_use]
    pub fn queue(mut self, queue: Arc<dyn CommandQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    #[must_use]
    pub fn admission(mut self, admission: Arc<dyn AdmissionCheck>) -> Self {
        self.admission = Some(admission);
        self
    }

    /// Base context every component is contextualized with.
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
    pub fn extensions(mut self, extensions: LifecycleExtensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Upper bound on the wait for queued preparations.
    #[must_use]
    pub fn prepare_timeout(mut self, timeout: Duration) -> Self {
        self.prepare_timeout = Some(timeout);
        self
    }

    /// Share an existing metrics collector.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<LifecycleMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> LifecycleOrchestrator {
        let registry = Arc::new(EntryRegistry::new());
        let locator = Arc::new(RegistryLocator::new(&registry));
        LifecycleOrchestrator {
            roles: self.roles,
            types: self.types,
            factory: self.factory,
            queue: self.queue,
            admission: self.admission,
            context: self.context,
            resources: self.resources,
            extensions: Arc::new(self.extensions),
            prepare_timeout: self.prepare_timeout,
            metrics: self.metrics.unwrap_or_default(),
            registry,
            locator,
            entries: RwLock::new(Vec::new()),
        }
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Outcome of one `dispose()` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposalSummary {
    pub disposed: usize,
    pub failed: usize,
}

impl DisposalSummary {
    pub fn attempted(&self) -> usize {
        self.disposed + self.failed
    }
}

/// Owns every registered handler of one container.
pub struct LifecycleOrchestrator {
    roles: Arc<dyn RoleResolver>,
    types: Arc<dyn TypeResolver>,
    factory: Arc<dyn ObjectFactory>,
    queue: Option<Arc<dyn CommandQueue>>,
    admission: Option<Arc<dyn AdmissionCheck>>,
    context: Context,
    resources: ResourceManagers,
    extensions: Arc<LifecycleExtensions>,
    prepare_timeout: Option<Duration>,
    metrics: Arc<LifecycleMetrics>,
    registry: Arc<EntryRegistry>,
    locator: Arc<RegistryLocator>,
    /// Registration order; an entry's index is its position here.
    entries: RwLock<Vec<Arc<HandlerEntry>>>,
}

impl LifecycleOrchestrator {
    pub fn builder(
        roles: Arc<dyn RoleResolver>,
        types: Arc<dyn TypeResolver>,
        factory: Arc<dyn ObjectFactory>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder {
            roles,
            types,
            factory,
            queue: None,
            admission: None,
            context: Context::new(),
            resources: ResourceManagers::new(),
            extensions: LifecycleExtensions::new(),
            prepare_timeout: None,
            metrics: None,
        }
    }

    /// Register one component. Nothing is constructed.
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` when no role lists the implementation
    /// - `InvalidArgument` for reserved, duplicate or conflicting-default hints
    /// - `HandlerCreation` when admission, type resolution or wiring fails
    pub fn add_component(&self, metadata: ComponentMetadata) -> Result<(), OrchestratorError> {
        let hint = metadata.hint().to_string();
        let implementation = metadata.implementation().clone();

        let result = self.register_component(metadata);
        match &result {
            Ok(()) => self.metrics.record_registration(),
            Err(error) => {
                self.metrics.record_registration_failure();
                warn!(
                    hint = %hint,
                    implementation = %implementation,
                    error = %error,
                    "[Orchestrator] component registration failed"
                );
            }
        }
        result
    }

    fn register_component(&self, metadata: ComponentMetadata) -> Result<(), OrchestratorError> {
        let creation_error = |cause: CreationCause| OrchestratorError::HandlerCreation {
            hint: metadata.hint().to_string(),
            implementation: metadata.implementation().clone(),
            cause,
        };

        let role_entry = self.roles.role_for(metadata.implementation()).ok_or_else(|| {
            OrchestratorError::RoleNotFound {
                implementation: metadata.implementation().clone(),
            }
        })?;
        let role = role_entry.role().clone();

        if is_reserved_hint(metadata.hint()) {
            return Err(OrchestratorError::InvalidArgument(
                RegistryError::ReservedHint {
                    role,
                    hint: metadata.hint().to_string(),
                },
            ));
        }

        if let Some(admission) = &self.admission {
            admission
                .admit(&role_entry, &metadata)
                .map_err(|e| creation_error(CreationCause::Rejected(e)))?;
        }

        let descriptor = self
            .types
            .load_type(metadata.implementation())
            .map_err(|e| creation_error(e.into()))?;

        let handler = ComponentHandler::new(
            role.clone(),
            metadata.hint(),
            descriptor,
            metadata.configuration().clone(),
            Arc::clone(&self.factory),
            Arc::clone(&self.extensions),
            Arc::clone(&self.metrics),
        );
        handler
            .wire(self.creation_context(&role, metadata.hint()))
            .map_err(|e| creation_error(e.into()))?;

        let is_default = metadata.is_default();
        let mut entries = self.entries.write();
        let entry = Arc::new(HandlerEntry::new(
            entries.len(),
            role.clone(),
            metadata,
            handler,
            Arc::clone(&self.metrics),
        ));
        self.registry
            .register(&role, entry.hint(), Arc::clone(&entry), is_default)
            .map_err(OrchestratorError::InvalidArgument)?;

        debug!(
            role = %role,
            hint = entry.hint(),
            implementation = %entry.implementation(),
            activation = %entry.metadata().activation(),
            "[Orchestrator] component registered"
        );
        entries.push(entry);
        Ok(())
    }

    fn creation_context(&self, role: &Role, hint: &str) -> CreationContext {
        let mut context = self.context.clone();
        context.put(CONTEXT_ROLE, role.clone());
        context.put(CONTEXT_HINT, hint.to_string());
        self.resources.install_into(&mut context);

        CreationContext {
            role: role.clone(),
            hint: hint.to_string(),
            context,
            locator: Arc::clone(&self.locator) as Arc<dyn ServiceLocator>,
            resources: self.resources.clone(),
        }
    }

    /// Prepare every eager component.
    ///
    /// # Errors
    ///
    /// A [`CompositeFailure`] listing every component that failed, could not
    /// be enqueued or did not finish within the preparation timeout.
    pub fn initialize(&self) -> Result<(), CompositeFailure> {
        let entries = self.entries();
        let (lazy, eager): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|entry| entry.metadata().is_lazy());

        for entry in &lazy {
            debug!(
                role = %entry.role(),
                hint = entry.hint(),
                "[Orchestrator] lazy component deferred to first lookup"
            );
        }

        info!(
            eager = eager.len(),
            lazy = lazy.len(),
            queued = self.queue.is_some(),
            "[Orchestrator] initializing components"
        );

        let failures = Arc::new(FailureCollector::new());
        let pending = match &self.queue {
            None => {
                for entry in &eager {
                    prepare_entry(entry, &failures, &self.metrics);
                }
                Vec::new()
            }
            Some(queue) => self.prepare_queued(queue.as_ref(), &eager, &failures),
        };

        let mut collected = failures.close();
        let limit = self.prepare_timeout.unwrap_or_default();
        for index in pending {
            if collected.iter().any(|failure| failure.index == index) {
                continue;
            }
            let Some(entry) = eager.iter().find(|entry| entry.index() == index) else {
                continue;
            };
            warn!(
                role = %entry.role(),
                hint = entry.hint(),
                timeout_ms = limit.as_millis() as u64,
                "[Orchestrator] eager component did not finish preparing in time"
            );
            self.metrics.record_preparation_failure();
            collected.push(PreparationFailure {
                index,
                role: entry.role().clone(),
                hint: entry.hint().to_string(),
                kind: FailureKind::TimedOut(limit),
            });
        }

        match CompositeFailure::from_failures(collected) {
            None => {
                info!(prepared = eager.len(), "[Orchestrator] initialization complete");
                Ok(())
            }
            Some(composite) => {
                warn!(
                    failed = composite.len(),
                    "[Orchestrator] initialization finished with failures"
                );
                Err(composite)
            }
        }
    }

    /// Enqueue one command per eager entry and wait for the latch. Returns
    /// the indices still pending when the wait ended.
    fn prepare_queued(
        &self,
        queue: &dyn CommandQueue,
        eager: &[Arc<HandlerEntry>],
        failures: &Arc<FailureCollector>,
    ) -> Vec<usize> {
        let latch = Arc::new(CompletionLatch::new(eager.iter().map(|e| e.index())));

        for entry in eager {
            let command = Arc::new(PrepareHandlerCommand::new(
                Arc::clone(entry),
                Arc::clone(failures),
                Arc::clone(&latch),
                Arc::clone(&self.metrics),
            ));
            if let Err(error) = queue.enqueue(command) {
                warn!(
                    role = %entry.role(),
                    hint = entry.hint(),
                    error = %error,
                    "[Orchestrator] failed to enqueue preparation"
                );
                self.metrics.record_preparation_failure();
                failures.push(PreparationFailure {
                    index: entry.index(),
                    role: entry.role().clone(),
                    hint: entry.hint().to_string(),
                    kind: FailureKind::Enqueue(error),
                });
                latch.complete(entry.index());
            }
        }

        latch.wait(self.prepare_timeout)
    }

    /// Dispose every handler in registration order. Never fails.
    pub fn dispose(&self) -> DisposalSummary {
        let entries = self.entries();
        info!(components = entries.len(), "[Orchestrator] disposing components");

        let mut summary = DisposalSummary::default();
        for entry in &entries {
            match entry.handler().dispose() {
                Ok(()) => {
                    summary.disposed += 1;
                    self.metrics.record_disposal(true);
                }
                Err(error) => {
                    summary.failed += 1;
                    self.metrics.record_disposal(false);
                    warn!(
                        role = %entry.role(),
                        hint = entry.hint(),
                        error = %error,
                        "[Orchestrator] component disposal failed"
                    );
                }
            }
        }

        info!(
            disposed = summary.disposed,
            failed = summary.failed,
            "[Orchestrator] disposal complete"
        );
        summary
    }

    /// Resolve the handler entry (or selector) for `role`/`hint`.
    pub fn lookup(
        &self,
        role: &Role,
        hint: Option<&str>,
    ) -> Result<Resolved<Arc<HandlerEntry>>, RegistryError> {
        self.registry.lookup(role, hint)
    }

    pub fn has(&self, role: &Role, hint: Option<&str>) -> bool {
        self.registry.has(role, hint)
    }

    /// Snapshot of all entries in registration order.
    pub fn entries(&self) -> Vec<Arc<HandlerEntry>> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn registry(&self) -> &Arc<EntryRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<LifecycleMetrics> {
        &self.metrics
    }

    /// Locator components receive for their dependencies.
    pub fn locator(&self) -> Arc<dyn ServiceLocator> {
        Arc::clone(&self.locator) as Arc<dyn ServiceLocator>
    }
}

impl std::fmt::Debug for LifecycleOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleOrchestrator")
            .field("components", &self.len())
            .field("queued", &self.queue.is_some())
            .field("prepare_timeout", &self.prepare_timeout)
            .finish_non_exhaustive()
    }
}
