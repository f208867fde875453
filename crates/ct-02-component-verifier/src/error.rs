//! Error types for component verification

use shared_types::{TypeKey, TypeNotFound};
use thiserror::Error;

use crate::domain::VerifyRule;

/// A component failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("[{}] component '{component}' ({type_key}): {detail}", .rule.code())]
    Violation {
        component: String,
        type_key: TypeKey,
        rule: VerifyRule,
        detail: String,
    },

    #[error("component '{component}': {source}")]
    TypeNotFound {
        component: String,
        #[source]
        source: TypeNotFound,
    },
}

impl VerifyError {
    /// The violated rule, `None` when a declared type could not be loaded.
    #[must_use]
    pub fn rule(&self) -> Option<VerifyRule> {
        match self {
            Self::Violation { rule, .. } => Some(*rule),
            Self::TypeNotFound { .. } => None,
        }
    }

    #[must_use]
    pub fn component(&self) -> &str {
        match self {
            Self::Violation { component, .. } | Self::TypeNotFound { component, .. } => component,
        }
    }
}
