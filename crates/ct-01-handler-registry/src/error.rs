//! Error types for the handler registry

use shared_types::Role;
use thiserror::Error;

/// Errors raised by registration and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid argument: hint '{hint}' is reserved (role '{role}')")]
    ReservedHint { role: Role, hint: String },

    #[error("invalid argument: hint '{hint}' is already registered for role '{role}'")]
    DuplicateHint { role: Role, hint: String },

    #[error(
        "invalid argument: role '{role}' already has '{existing}' as explicit default, \
         cannot also mark '{hint}'"
    )]
    ConflictingDefault {
        role: Role,
        existing: String,
        hint: String,
    },

    #[error("no handler for role '{role}' with hint '{hint}'")]
    NotFound { role: Role, hint: String },
}

impl RegistryError {
    /// Whether the caller passed an argument the registry refuses.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}
