//! Inbound Ports (Driving Ports)

use shared_types::Role;

use crate::domain::Resolved;
use crate::error::RegistryError;

/// Registration and resolution of handlers by role and hint.
pub trait HandlerDirectory<H>: Send + Sync {
    /// Register `handler` under `hint` for `role`.
    ///
    /// # Errors
    ///
    /// Reserved hints, duplicate hints and a second explicit default for the
    /// same role are refused.
    fn register(&self, role: &Role, hint: &str, handler: H, is_default: bool)
        -> Result<(), RegistryError>;

    /// Resolve a handler.
    ///
    /// Without a hint: the selector when the role has one, otherwise the
    /// default handler. With a hint: the exact entry.
    fn lookup(&self, role: &Role, hint: Option<&str>) -> Result<Resolved<H>, RegistryError>;

    /// Same resolution as [`lookup`](Self::lookup), reported as a boolean.
    fn has(&self, role: &Role, hint: Option<&str>) -> bool {
        self.lookup(role, hint).is_ok()
    }
}
