//! # Error Types
//!
//! Errors shared by the component model and every container crate.

use std::fmt;

use thiserror::Error;

use crate::entities::{Role, TypeKey};

/// A user hint collided with `"*"` or `"$"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hint '{0}' is reserved for the container")]
pub struct ReservedHint(pub String);

/// The type catalog has no entry for a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type not found: {0}")]
pub struct TypeNotFound(pub TypeKey);

/// Errors reading a configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("element <{element}> at {location} has no attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: String,
        location: String,
    },

    #[error("element <{element}> has no value")]
    MissingValue { element: String },

    #[error("element <{element}> attribute '{attribute}' = '{value}' is not {expected}")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
        expected: &'static str,
    },
}

/// Errors raised when a component looks up another component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no component for role '{role}' with hint '{hint}'")]
    NotFound { role: Role, hint: String },

    #[error("component for role '{role}' is unavailable: {reason}")]
    Unavailable { role: Role, reason: String },
}

/// Lifecycle stage a component passes through while being built or torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    Construct,
    EnableLogging,
    Contextualize,
    Service,
    Inject,
    Configure,
    Parameterize,
    Initialize,
    Start,
    Stop,
    Dispose,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Construct => "construct",
            Self::EnableLogging => "enable_logging",
            Self::Contextualize => "contextualize",
            Self::Service => "service",
            Self::Inject => "inject",
            Self::Configure => "configure",
            Self::Parameterize => "parameterize",
            Self::Initialize => "initialize",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Dispose => "dispose",
        };
        f.write_str(name)
    }
}

/// Failure reported by a component from one of its lifecycle methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{stage} failed: {reason}")]
    StageFailed {
        stage: LifecycleStage,
        reason: String,
    },

    #[error("configuration rejected: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("dependency unavailable: {0}")]
    Dependency(#[from] LookupError),
}

impl LifecycleError {
    /// Shorthand for a stage failure.
    pub fn failed(stage: LifecycleStage, reason: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            reason: reason.into(),
        }
    }
}
