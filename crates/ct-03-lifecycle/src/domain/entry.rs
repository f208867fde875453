//! Registered handler entries.

use std::sync::Arc;

use shared_types::{ComponentInstance, ComponentMetadata, Role, TypeKey};
use uuid::Uuid;

use super::handler::ComponentHandler;
use super::state::HandlerState;
use crate::error::HandlerError;
use crate::metrics::LifecycleMetrics;

/// A handler paired with the metadata it was registered from.
#[derive(Debug)]
pub struct HandlerEntry {
    id: Uuid,
    index: usize,
    role: Role,
    metadata: ComponentMetadata,
    handler: ComponentHandler,
    metrics: Arc<LifecycleMetrics>,
}

impl HandlerEntry {
    pub fn new(
        index: usize,
        role: Role,
        metadata: ComponentMetadata,
        handler: ComponentHandler,
        metrics: Arc<LifecycleMetrics>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            role,
            metadata,
            handler,
            metrics,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Position in registration order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn hint(&self) -> &str {
        self.metadata.hint()
    }

    pub fn implementation(&self) -> &TypeKey {
        self.metadata.implementation()
    }

    pub fn metadata(&self) -> &ComponentMetadata {
        &self.metadata
    }

    pub fn handler(&self) -> &ComponentHandler {
        &self.handler
    }

    pub fn state(&self) -> HandlerState {
        self.handler.state()
    }

    /// Materialize (if needed) and return the instance.
    pub fn resolve(&self) -> Result<ComponentInstance, HandlerError> {
        let (instance, constructed) = self.handler.get_tracked()?;
        if constructed && self.metadata.is_lazy() {
            self.metrics.record_lazy_materialization();
        }
        Ok(instance)
    }
}
