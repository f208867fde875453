//! Service locator handed to components that pull or receive dependencies.

use std::sync::{Arc, Weak};

use ct_01_handler_registry::{HandlerDirectory, HandlerRegistry, RegistryError, Resolved};
use shared_types::{ComponentInstance, LookupError, Role, ServiceLocator};

use crate::domain::HandlerEntry;

pub type EntryRegistry = HandlerRegistry<Arc<HandlerEntry>>;

/// Resolves dependencies against the container's registry.
///
/// Holds the registry weakly: components keep their locator, and the
/// registry keeps the components.
#[derive(Clone)]
pub struct RegistryLocator {
    registry: Weak<EntryRegistry>,
}

impl RegistryLocator {
    pub fn new(registry: &Arc<EntryRegistry>) -> Self {
        Self {
            registry: Arc::downgrade(registry),
        }
    }

    fn registry(&self, role: &Role) -> Result<Arc<EntryRegistry>, LookupError> {
        self.registry.upgrade().ok_or_else(|| LookupError::Unavailable {
            role: role.clone(),
            reason: "container has been dropped".to_string(),
        })
    }
}

impl ServiceLocator for RegistryLocator {
    /// A hint-less lookup on a role with several implementations yields the
    /// selector's default.
    fn lookup(&self, role: &Role, hint: Option<&str>) -> Result<ComponentInstance, LookupError> {
        let registry = self.registry(role)?;
        let resolved = registry.lookup(role, hint).map_err(|error| match error {
            RegistryError::NotFound { role, hint } => LookupError::NotFound { role, hint },
            other => LookupError::Unavailable {
                role: role.clone(),
                reason: other.to_string(),
            },
        })?;

        let entry = match resolved {
            Resolved::Handler(entry) => entry,
            Resolved::Selector(selector) => {
                selector
                    .default_handler()
                    .ok_or_else(|| LookupError::NotFound {
                        role: role.clone(),
                        hint: hint.unwrap_or("*").to_string(),
                    })?
            }
        };

        entry.resolve().map_err(|error| LookupError::Unavailable {
            role: role.clone(),
            reason: error.to_string(),
        })
    }

    fn has(&self, role: &Role, hint: Option<&str>) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.has(role, hint))
    }
}

impl std::fmt::Debug for RegistryLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryLocator")
            .field("attached", &(self.registry.strong_count() > 0))
            .finish()
    }
}
