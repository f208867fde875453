//! Error types for the lifecycle crate

use ct_01_handler_registry::RegistryError;
use shared_types::{LifecycleError, LifecycleStage, Role, TypeKey, TypeNotFound};
use thiserror::Error;

/// Rejection returned by an admission check.
pub type AdmissionError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by an object factory.
#[derive(Debug, Clone, Error)]
pub enum FactoryError {
    #[error("no constructor registered for {0}")]
    NoConstructor(TypeKey),

    #[error("{implementation} failed to {stage}: {source}")]
    Lifecycle {
        implementation: TypeKey,
        stage: LifecycleStage,
        #[source]
        source: LifecycleError,
    },
}

/// Errors raised while filling a type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("type {0} is already registered")]
    Duplicate(TypeKey),
}

/// Errors raised by a component handler.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("handler {role}/{hint} has not been wired")]
    NotWired { role: Role, hint: String },

    #[error("handler {role}/{hint} has been disposed")]
    Disposed { role: Role, hint: String },

    #[error("factory cannot construct {implementation} for {role}/{hint}")]
    Unconstructible {
        role: Role,
        hint: String,
        implementation: TypeKey,
    },

    #[error("circular dependency detected while preparing {role}/{hint}")]
    CircularDependency { role: Role, hint: String },

    #[error("component {role}/{hint} panicked: {message}")]
    Panicked {
        role: Role,
        hint: String,
        message: String,
    },

    #[error("failed to create {role}/{hint}: {source}")]
    Creation {
        role: Role,
        hint: String,
        #[source]
        source: FactoryError,
    },

    #[error("extension '{extension}' failed for {role}/{hint}: {source}")]
    Extension {
        role: Role,
        hint: String,
        extension: String,
        #[source]
        source: LifecycleError,
    },

    #[error("failed to dispose {role}/{hint}: {source}")]
    Disposal {
        role: Role,
        hint: String,
        #[source]
        source: FactoryError,
    },
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Errors raised by a command queue.
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    #[error("command queue rejected '{command}': {reason}")]
    Rejected { command: String, reason: String },

    #[error("command queue unavailable: {0}")]
    Unavailable(String),
}

/// Why a handler could not be created during registration.
#[derive(Debug, Error)]
pub enum CreationCause {
    #[error(transparent)]
    TypeNotFound(#[from] TypeNotFound),

    #[error("admission check rejected the component: {0}")]
    Rejected(#[source] AdmissionError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Errors raised by `add_component`.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Reserved hint, duplicate hint or conflicting default.
    #[error(transparent)]
    InvalidArgument(RegistryError),

    #[error("no role is registered for implementation {implementation}")]
    RoleNotFound { implementation: TypeKey },

    #[error("cannot create handler for '{hint}' ({implementation}): {cause}")]
    HandlerCreation {
        hint: String,
        implementation: TypeKey,
        #[source]
        cause: CreationCause,
    },
}
