//! Outbound Ports (Driven Ports)
//!
//! Collaborators the orchestrator depends on: role resolution, instance
//! construction, background execution and an optional admission check.

use std::sync::Arc;

use shared_types::{
    ComponentInstance, ComponentMetadata, Configuration, Context, ResourceManagers, Role,
    ServiceLocator, TypeDescriptor, TypeKey,
};

use crate::domain::RoleEntry;
use crate::error::{AdmissionError, FactoryError, QueueError};

/// Maps an implementation to the role it serves.
pub trait RoleResolver: Send + Sync {
    fn role_for(&self, implementation: &TypeKey) -> Option<Arc<RoleEntry>>;
}

/// Everything a factory needs besides the descriptor and configuration.
#[derive(Clone)]
pub struct CreationContext {
    pub role: Role,
    pub hint: String,
    /// Container context plus the component's own role and hint entries.
    pub context: Context,
    pub locator: Arc<dyn ServiceLocator>,
    pub resources: ResourceManagers,
}

impl std::fmt::Debug for CreationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreationContext")
            .field("role", &self.role)
            .field("hint", &self.hint)
            .field("context", &self.context)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

/// Builds and tears down component instances.
pub trait ObjectFactory: Send + Sync {
    /// Whether this factory can build instances of `descriptor`.
    fn can_create(&self, descriptor: &TypeDescriptor) -> bool;

    /// Construct an instance and run its creation lifecycle.
    fn new_instance(
        &self,
        descriptor: &TypeDescriptor,
        configuration: &Configuration,
        creation: &CreationContext,
    ) -> Result<ComponentInstance, FactoryError>;

    /// Run the instance's teardown lifecycle.
    fn dispose(
        &self,
        descriptor: &TypeDescriptor,
        instance: &ComponentInstance,
    ) -> Result<(), FactoryError>;
}

/// A unit of deferred work.
///
/// Queues may run a command more than once; implementations must tolerate
/// repeated execution.
pub trait Command: Send + Sync {
    fn execute(&self);

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Executes commands, possibly on other threads.
pub trait CommandQueue: Send + Sync {
    fn enqueue(&self, command: Arc<dyn Command>) -> Result<(), QueueError>;
}

/// Gate run before a handler is built; rejections abort the registration.
pub trait AdmissionCheck: Send + Sync {
    fn admit(&self, entry: &RoleEntry, metadata: &ComponentMetadata) -> Result<(), AdmissionError>;
}
