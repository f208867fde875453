//! Lookup results and the per-role selector.

use std::sync::Arc;

use shared_types::Role;

use super::hint_map::HintMap;
use crate::error::RegistryError;

/// Snapshot of one role's hints, returned by a hint-less lookup on a role
/// with several implementations.
#[derive(Debug, Clone)]
pub struct Selector<H> {
    role: Role,
    map: Arc<HintMap<H>>,
}

impl<H: Clone> Selector<H> {
    pub(crate) fn new(role: Role, map: Arc<HintMap<H>>) -> Self {
        Self { role, map }
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Selectable hints in sorted order.
    #[must_use]
    pub fn hints(&self) -> Vec<String> {
        self.map.hints()
    }

    #[must_use]
    pub fn has(&self, hint: &str) -> bool {
        self.map.named(hint).is_some()
    }

    pub fn select(&self, hint: &str) -> Result<H, RegistryError> {
        self.map
            .named(hint)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                role: self.role.clone(),
                hint: hint.to_string(),
            })
    }

    /// Handler the role resolves to by default.
    #[must_use]
    pub fn default_handler(&self) -> Option<H> {
        self.map.default_handler().cloned()
    }

    /// Named hint explicitly flagged default, if any.
    #[must_use]
    pub fn default_hint(&self) -> Option<&str> {
        self.map.explicit_default()
    }
}

/// Outcome of a lookup.
#[derive(Debug, Clone)]
pub enum Resolved<H> {
    Handler(H),
    Selector(Selector<H>),
}

impl<H: Clone> Resolved<H> {
    #[must_use]
    pub fn is_selector(&self) -> bool {
        matches!(self, Self::Selector(_))
    }

    #[must_use]
    pub fn handler(&self) -> Option<&H> {
        match self {
            Self::Handler(handler) => Some(handler),
            Self::Selector(_) => None,
        }
    }

    #[must_use]
    pub fn selector(&self) -> Option<&Selector<H>> {
        match self {
            Self::Selector(selector) => Some(selector),
            Self::Handler(_) => None,
        }
    }

    /// The handler, or the selector's default handler.
    #[must_use]
    pub fn into_effective_handler(self) -> Option<H> {
        match self {
            Self::Handler(handler) => Some(handler),
            Self::Selector(selector) => selector.default_handler(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> Selector<&'static str> {
        let role = Role::new("demo.Logger");
        let mut map = HintMap::new();
        map.insert(&role, "file", "file-handler", false).unwrap();
        map.insert(&role, "console", "console-handler", true).unwrap();
        Selector::new(role, Arc::new(map))
    }

    #[test]
    fn test_select_by_hint() {
        let selector = selector();
        assert_eq!(selector.select("file").unwrap(), "file-handler");
        assert!(selector.has("console"));
        assert!(!selector.has("network"));
        assert!(matches!(
            selector.select("network"),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_selector_default() {
        let selector = selector();
        assert_eq!(selector.default_handler(), Some("console-handler"));
        assert_eq!(selector.default_hint(), Some("console"));

        let resolved = Resolved::Selector(selector);
        assert!(resolved.is_selector());
        assert!(resolved.handler().is_none());
        assert_eq!(resolved.into_effective_handler(), Some("console-handler"));
    }
}
