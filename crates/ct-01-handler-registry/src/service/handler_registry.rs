//! Thread-safe handler registry.
//!
//! Writers clone the affected role's [`HintMap`], apply the change and swap
//! the `Arc`. Readers hold the lock only long enough to clone that `Arc`, so
//! a lookup always sees a complete map even while registration continues.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{HintKey, Role, DEFAULT_ENTRY};
use tracing::debug;

use crate::domain::{HintMap, Resolved, Selector, Slot};
use crate::error::RegistryError;
use crate::ports::HandlerDirectory;

/// Registry of handlers keyed by role and hint.
pub struct HandlerRegistry<H> {
    roles: RwLock<HashMap<Role, Arc<HintMap<H>>>>,
}

impl<H> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }
}

impl<H: Clone + Send + Sync> HandlerRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, role: &Role) -> Option<Arc<HintMap<H>>> {
        self.roles.read().get(role).cloned()
    }

    /// Registered roles, sorted.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.roles.read().keys().cloned().collect();
        roles.sort();
        roles
    }

    /// Named hints of a role, sorted. Empty for unknown roles.
    #[must_use]
    pub fn hints(&self, role: &Role) -> Vec<String> {
        self.snapshot(role).map(|map| map.hints()).unwrap_or_default()
    }

    /// Number of roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.read().is_empty()
    }
}

impl<H: Clone + Send + Sync> HandlerDirectory<H> for HandlerRegistry<H> {
    fn register(
        &self,
        role: &Role,
        hint: &str,
        handler: H,
        is_default: bool,
    ) -> Result<(), RegistryError> {
        let mut roles = self.roles.write();
        let mut map = roles
            .get(role)
            .map(|existing| HintMap::clone(existing))
            .unwrap_or_default();
        map.insert(role, hint, handler, is_default)?;

        debug!(
            role = %role,
            hint,
            is_default,
            hints = map.named_count(),
            selector = map.has_selector(),
            "[HandlerRegistry] registered handler"
        );
        roles.insert(role.clone(), Arc::new(map));
        Ok(())
    }

    fn lookup(&self, role: &Role, hint: Option<&str>) -> Result<Resolved<H>, RegistryError> {
        let not_found = || RegistryError::NotFound {
            role: role.clone(),
            hint: hint.unwrap_or(DEFAULT_ENTRY).to_string(),
        };
        let map = self.snapshot(role).ok_or_else(not_found)?;

        let key = match hint {
            None if map.has_selector() => HintKey::Selector,
            None => HintKey::Default,
            Some(raw) => HintKey::parse(raw),
        };

        match map.get(&key) {
            Some(Slot::Handler(handler)) => Ok(Resolved::Handler(handler.clone())),
            Some(Slot::Selector) => Ok(Resolved::Selector(Selector::new(
                role.clone(),
                Arc::clone(&map),
            ))),
            None => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn logger() -> Role {
        Role::new("demo.Logger")
    }

    #[test]
    fn test_logger_scenario() {
        // Arrange
        let registry = HandlerRegistry::new();
        registry.register(&logger(), "console", "console", true).unwrap();
        registry.register(&logger(), "file", "file", false).unwrap();

        // Act
        let hintless = registry.lookup(&logger(), None).unwrap();
        let file = registry.lookup(&logger(), Some("file")).unwrap();

        // Assert
        let selector = hintless.selector().unwrap();
        assert_eq!(selector.default_handler(), Some("console"));
        assert_eq!(file.handler(), Some(&"file"));
        assert!(!registry.has(&logger(), Some("network")));
    }

    #[test]
    fn test_single_hint_resolves_directly() {
        let registry = HandlerRegistry::new();
        registry.register(&logger(), "console", 7_u32, false).unwrap();

        let resolved = registry.lookup(&logger(), None).unwrap();
        assert_eq!(resolved.handler(), Some(&7));
        assert!(registry.has(&logger(), None));
        assert!(!registry.has(&logger(), Some("$")));
    }

    #[test]
    fn test_reserved_hint_lookups_map_to_reserved_entries() {
        let registry = HandlerRegistry::new();
        registry.register(&logger(), "a", 1_u32, false).unwrap();
        registry.register(&logger(), "b", 2_u32, false).unwrap();

        assert_eq!(
            registry.lookup(&logger(), Some("*")).unwrap().handler(),
            Some(&1)
        );
        assert!(registry.lookup(&logger(), Some("$")).unwrap().is_selector());
    }

    #[test]
    fn test_unknown_role_not_found() {
        let registry: HandlerRegistry<u32> = HandlerRegistry::new();
        let err = registry.lookup(&logger(), None).unwrap_err();
        assert!(!err.is_invalid_argument());
        assert_eq!(
            err,
            RegistryError::NotFound {
                role: logger(),
                hint: "*".to_string()
            }
        );
        assert!(!registry.has(&logger(), Some("console")));
    }

    #[test]
    fn test_failed_register_leaves_role_untouched() {
        let registry = HandlerRegistry::new();
        registry.register(&logger(), "console", 1_u32, true).unwrap();

        assert!(registry.register(&logger(), "file", 2, true).is_err());
        assert!(registry.register(&logger(), "$", 3, false).is_err());
        assert_eq!(registry.hints(&logger()), vec!["console"]);
        assert_eq!(registry.roles(), vec![logger()]);
    }

    #[test]
    fn test_selector_snapshot_is_stable() {
        let registry = HandlerRegistry::new();
        registry.register(&logger(), "a", 1_u32, false).unwrap();
        registry.register(&logger(), "b", 2_u32, false).unwrap();
        let before = registry.lookup(&logger(), None).unwrap();

        registry.register(&logger(), "c", 3_u32, false).unwrap();

        assert_eq!(before.selector().unwrap().hints(), vec!["a", "b"]);
        assert_eq!(registry.hints(&logger()), vec!["a", "b", "c"]);
    }

    fn hint_strategy() -> impl Strategy<Value = std::collections::BTreeSet<String>> {
        prop::collection::btree_set("[a-z]{1,8}", 1..12)
    }

    proptest! {
        #[test]
        fn prop_many_hints_yield_selector(hints in hint_strategy()) {
            let registry = HandlerRegistry::new();
            for (i, hint) in hints.iter().enumerate() {
                registry.register(&logger(), hint, i, false).unwrap();
            }

            let resolved = registry.lookup(&logger(), None).unwrap();
            prop_assert!(registry.has(&logger(), None));
            prop_assert_eq!(resolved.is_selector(), hints.len() > 1);
            prop_assert_eq!(resolved.into_effective_handler(), Some(0));
        }

        #[test]
        fn prop_reserved_hints_always_rejected(
            hints in hint_strategy(),
            reserved in prop::sample::select(vec!["*", "$"]),
            is_default in any::<bool>(),
        ) {
            let registry = HandlerRegistry::new();
            for hint in &hints {
                registry.register(&logger(), hint, 0_u8, false).unwrap();
            }

            let err = registry.register(&logger(), reserved, 1, is_default).unwrap_err();
            prop_assert!(err.is_invalid_argument());
            prop_assert_eq!(registry.hints(&logger()).len(), hints.len());
        }

        #[test]
        fn prop_explicit_default_is_order_independent(
            hints in hint_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            let hints: Vec<String> = hints.into_iter().collect();
            let chosen = pick.index(hints.len());
            let registry = HandlerRegistry::new();
            for (i, hint) in hints.iter().enumerate() {
                registry.register(&logger(), hint, i, i == chosen).unwrap();
            }

            let resolved = registry.lookup(&logger(), None).unwrap();
            prop_assert_eq!(resolved.into_effective_handler(), Some(chosen));
        }
    }
}
