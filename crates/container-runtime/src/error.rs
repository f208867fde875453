//! Error types for the container facade

use ct_01_handler_registry::RegistryError;
use ct_02_component_verifier::VerifyError;
use ct_03_lifecycle::{
    CompositeFailure, CreationCause, HandlerError, OrchestratorError, QueueError, RoleError,
};
use shared_types::{ConfigurationError, Role, TypeKey};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by [`Container`](crate::Container) operations.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Reserved hint, duplicate hint or conflicting default.
    #[error(transparent)]
    InvalidArgument(RegistryError),

    /// `resolve` without a hint on a role with several implementations.
    #[error("invalid argument: role '{role}' has several implementations ({}), a hint is required", .hints.join(", "))]
    SelectorRequiresHint { role: Role, hints: Vec<String> },

    #[error("no role is registered for implementation {implementation}")]
    RoleNotFound { implementation: TypeKey },

    #[error("cannot create handler for '{hint}' ({implementation}): {cause}")]
    HandlerCreation {
        hint: String,
        implementation: TypeKey,
        #[source]
        cause: CreationCause,
    },

    #[error("no component for role '{role}' with hint '{hint}'")]
    NotFound { role: Role, hint: String },

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("component {role}/{hint} is not a {expected}")]
    TypeMismatch {
        role: Role,
        hint: String,
        expected: &'static str,
    },

    #[error("element <{element}> is neither 'component' nor a known role shorthand")]
    UnknownShorthand { element: String },

    #[error(transparent)]
    Composite(#[from] CompositeFailure),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Malformed(#[from] ConfigurationError),

    #[error(transparent)]
    Roles(#[from] RoleError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl ContainerError {
    /// Whether the caller passed an argument the container refuses.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::SelectorRequiresHint { .. }
        )
    }

    /// The verifier's verdict when admission rejected the component.
    #[must_use]
    pub fn verify_error(&self) -> Option<&VerifyError> {
        match self {
            Self::HandlerCreation {
                cause: CreationCause::Rejected(rejection),
                ..
            } => rejection.downcast_ref::<VerifyError>(),
            _ => None,
        }
    }
}

impl From<OrchestratorError> for ContainerError {
    fn from(error: OrchestratorError) -> Self {
        match error {
            OrchestratorError::InvalidArgument(source) => Self::InvalidArgument(source),
            OrchestratorError::RoleNotFound { implementation } => {
                Self::RoleNotFound { implementation }
            }
            OrchestratorError::HandlerCreation {
                hint,
                implementation,
                cause,
            } => Self::HandlerCreation {
                hint,
                implementation,
                cause,
            },
        }
    }
}

impl From<RegistryError> for ContainerError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::NotFound { role, hint } => Self::NotFound { role, hint },
            other => Self::InvalidArgument(other),
        }
    }
}
