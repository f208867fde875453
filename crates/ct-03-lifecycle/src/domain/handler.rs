//! # Component Handler
//!
//! Lifecycle wrapper around a single component instance.
//!
//! ## Concurrency
//!
//! - `prepare()` is build-once: a fast path reads the published instance,
//!   the slow path takes the preparation mutex and re-checks before
//!   constructing. Concurrent first callers therefore share one instance.
//! - `dispose()` takes the same mutex, so it waits for an in-flight
//!   preparation instead of racing it.
//! - A thread that re-enters `prepare()` on a handler it is already
//!   preparing gets `CircularDependency` rather than deadlocking.
//! - A panic raised by the component during construction or teardown is
//!   caught and reported as `HandlerError::Panicked`. A failed construction
//!   leaves the handler `Wired`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};
use shared_types::{ComponentInstance, Configuration, Role, TypeDescriptor};
use tracing::{debug, warn};

use super::extensions::LifecycleExtensions;
use super::state::HandlerState;
use crate::error::{panic_message, HandlerError};
use crate::metrics::LifecycleMetrics;
use crate::ports::{CreationContext, ObjectFactory};

struct Published {
    state: HandlerState,
    instance: Option<ComponentInstance>,
}

/// Owns the construction, access and teardown of one component.
pub struct ComponentHandler {
    role: Role,
    hint: String,
    descriptor: Arc<TypeDescriptor>,
    configuration: Configuration,
    factory: Arc<dyn ObjectFactory>,
    extensions: Arc<LifecycleExtensions>,
    metrics: Arc<LifecycleMetrics>,
    creation: RwLock<Option<CreationContext>>,
    published: RwLock<Published>,
    prepare_lock: Mutex<()>,
    preparing_on: Mutex<Option<ThreadId>>,
    constructions: AtomicU64,
}

/// Clears the preparing-thread marker when preparation ends.
struct PreparingGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for PreparingGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock() = None;
    }
}

impl ComponentHandler {
    pub fn new(
        role: Role,
        hint: impl Into<String>,
        descriptor: Arc<TypeDescriptor>,
        configuration: Configuration,
        factory: Arc<dyn ObjectFactory>,
        extensions: Arc<LifecycleExtensions>,
        metrics: Arc<LifecycleMetrics>,
    ) -> Self {
        Self {
            role,
            hint: hint.into(),
            descriptor,
            configuration,
            factory,
            extensions,
            metrics,
            creation: RwLock::new(None),
            published: RwLock::new(Published {
                state: HandlerState::New,
                instance: None,
            }),
            prepare_lock: Mutex::new(()),
            preparing_on: Mutex::new(None),
            constructions: AtomicU64::new(0),
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> HandlerState {
        self.published.read().state
    }

    /// Number of underlying constructions so far.
    pub fn construction_count(&self) -> u64 {
        self.constructions.load(Ordering::Acquire)
    }

    /// Bind the factory, context, dependencies and resources.
    /// `New → Wired`; nothing is constructed.
    pub fn wire(&self, creation: CreationContext) -> Result<(), HandlerError> {
        if !self.factory.can_create(&self.descriptor) {
            return Err(HandlerError::Unconstructible {
                role: self.role.clone(),
                hint: self.hint.clone(),
                implementation: self.descriptor.key().clone(),
            });
        }

        let mut published = self.published.write();
        match published.state {
            HandlerState::New => {
                *self.creation.write() = Some(creation);
                published.state = HandlerState::Wired;
                Ok(())
            }
            HandlerState::Disposed => Err(self.disposed()),
            HandlerState::Wired | HandlerState::Prepared => Ok(()),
        }
    }

    /// Construct the instance if it does not exist yet.
    pub fn prepare(&self) -> Result<ComponentInstance, HandlerError> {
        self.prepare_tracked().map(|(instance, _)| instance)
    }

    /// Like [`prepare`](Self::prepare), also reporting whether this call
    /// performed the construction.
    pub fn prepare_tracked(&self) -> Result<(ComponentInstance, bool), HandlerError> {
        if let Some(instance) = self.published_instance() {
            return Ok((instance, false));
        }

        let current = thread::current().id();
        if *self.preparing_on.lock() == Some(current) {
            return Err(HandlerError::CircularDependency {
                role: self.role.clone(),
                hint: self.hint.clone(),
            });
        }

        let _prepare = self.prepare_lock.lock();
        *self.preparing_on.lock() = Some(current);
        let _preparing = PreparingGuard(&self.preparing_on);

        {
            let published = self.published.read();
            match published.state {
                HandlerState::New => return Err(self.not_wired()),
                HandlerState::Disposed => return Err(self.disposed()),
                HandlerState::Prepared => {
                    if let Some(instance) = &published.instance {
                        return Ok((Arc::clone(instance), false));
                    }
                }
                HandlerState::Wired => {}
            }
        }

        let creation = self.creation.read().clone().ok_or_else(|| self.not_wired())?;
        self.constructions.fetch_add(1, Ordering::AcqRel);
        self.metrics.record_construction();

        let instance = self.guarded(|| self.construct(&creation))?;

        let mut published = self.published.write();
        published.instance = Some(Arc::clone(&instance));
        published.state = HandlerState::Prepared;
        debug!(role = %self.role, hint = %self.hint, "[Handler] prepared");
        Ok((instance, true))
    }

    /// Build through the factory and run the creation extensions.
    fn construct(&self, creation: &CreationContext) -> Result<ComponentInstance, HandlerError> {
        let instance = self
            .factory
            .new_instance(&self.descriptor, &self.configuration, creation)
            .map_err(|source| HandlerError::Creation {
                role: self.role.clone(),
                hint: self.hint.clone(),
                source,
            })?;

        if let Err((extension, source)) = self.extensions.run_create(&instance, &creation.context) {
            if let Err(cleanup) = self.factory.dispose(&self.descriptor, &instance) {
                warn!(
                    role = %self.role,
                    hint = %self.hint,
                    error = %cleanup,
                    "[Handler] cleanup after failed creation extension failed"
                );
            }
            return Err(HandlerError::Extension {
                role: self.role.clone(),
                hint: self.hint.clone(),
                extension,
                source,
            });
        }
        Ok(instance)
    }

    /// Run component code, turning a panic into `HandlerError::Panicked`.
    fn guarded<T>(
        &self,
        work: impl FnOnce() -> Result<T, HandlerError>,
    ) -> Result<T, HandlerError> {
        catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            warn!(
                role = %self.role,
                hint = %self.hint,
                panic = %message,
                "[Handler] component panicked"
            );
            Err(HandlerError::Panicked {
                role: self.role.clone(),
                hint: self.hint.clone(),
                message,
            })
        })
    }

    /// Prepare if needed, run access extensions and hand out the instance.
    pub fn get(&self) -> Result<ComponentInstance, HandlerError> {
        self.get_tracked().map(|(instance, _)| instance)
    }

    pub fn get_tracked(&self) -> Result<(ComponentInstance, bool), HandlerError> {
        let (instance, constructed) = self.prepare_tracked()?;
        if !self.extensions.is_empty() {
            let context = self
                .creation
                .read()
                .as_ref()
                .map(|creation| creation.context.clone())
                .unwrap_or_default();
            self.extensions
                .run_access(&instance, &context)
                .map_err(|(extension, source)| HandlerError::Extension {
                    role: self.role.clone(),
                    hint: self.hint.clone(),
                    extension,
                    source,
                })?;
        }
        Ok((instance, constructed))
    }

    /// Tear the instance down. Idempotent; waits for in-flight preparation.
    pub fn dispose(&self) -> Result<(), HandlerError> {
        let _prepare = self.prepare_lock.lock();
        let instance = {
            let mut published = self.published.write();
            if published.state == HandlerState::Disposed {
                return Ok(());
            }
            published.state = HandlerState::Disposed;
            published.instance.take()
        };

        let Some(instance) = instance else {
            debug!(role = %self.role, hint = %self.hint, "[Handler] disposed before preparation");
            return Ok(());
        };

        let context = self
            .creation
            .read()
            .as_ref()
            .map(|creation| creation.context.clone())
            .unwrap_or_default();
        self.guarded(|| {
            let destroyed = self.extensions.run_destroy(&instance, &context);
            let disposed = self.factory.dispose(&self.descriptor, &instance);

            if let Err((extension, source)) = destroyed {
                return Err(HandlerError::Extension {
                    role: self.role.clone(),
                    hint: self.hint.clone(),
                    extension,
                    source,
                });
            }
            disposed.map_err(|source| HandlerError::Disposal {
                role: self.role.clone(),
                hint: self.hint.clone(),
                source,
            })
        })?;
        debug!(role = %self.role, hint = %self.hint, "[Handler] disposed");
        Ok(())
    }

    fn published_instance(&self) -> Option<ComponentInstance> {
        let published = self.published.read();
        match (&published.state, &published.instance) {
            (HandlerState::Prepared, Some(instance)) => Some(Arc::clone(instance)),
            _ => None,
        }
    }

    fn not_wired(&self) -> HandlerError {
        HandlerError::NotWired {
            role: self.role.clone(),
            hint: self.hint.clone(),
        }
    }

    fn disposed(&self) -> HandlerError {
        HandlerError::Disposed {
            role: self.role.clone(),
            hint: self.hint.clone(),
        }
    }
}

impl std::fmt::Debug for ComponentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHandler")
            .field("role", &self.role)
            .field("hint", &self.hint)
            .field("implementation", self.descriptor.key())
            .field("state", &self.state())
            .field("constructions", &self.construction_count())
            .finish()
    }
}
