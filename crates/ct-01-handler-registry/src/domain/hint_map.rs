//! Per-role hint table.

use std::collections::BTreeMap;

use shared_types::{HintKey, Role};

use crate::error::RegistryError;

/// Value stored under one hint key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<H> {
    Handler(H),
    /// Marker resolved into a [`Selector`](super::Selector) on lookup.
    Selector,
}

/// All entries of one role.
///
/// Invariants maintained by [`HintMap::insert`]:
/// - a `Default` slot exists once any hint is registered;
/// - a `Selector` slot exists whenever more than one named hint is present;
/// - at most one named hint was flagged default.
#[derive(Debug, Clone)]
pub struct HintMap<H> {
    entries: BTreeMap<HintKey, Slot<H>>,
    explicit_default: Option<String>,
}

impl<H> Default for HintMap<H> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            explicit_default: None,
        }
    }
}

impl<H: Clone> HintMap<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named hint.
    ///
    /// The map is left untouched when an error is returned.
    pub fn insert(
        &mut self,
        role: &Role,
        hint: &str,
        handler: H,
        is_default: bool,
    ) -> Result<(), RegistryError> {
        let key = HintKey::named(hint).map_err(|_| RegistryError::ReservedHint {
            role: role.clone(),
            hint: hint.to_string(),
        })?;

        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateHint {
                role: role.clone(),
                hint: hint.to_string(),
            });
        }
        if is_default {
            if let Some(existing) = &self.explicit_default {
                return Err(RegistryError::ConflictingDefault {
                    role: role.clone(),
                    existing: existing.clone(),
                    hint: hint.to_string(),
                });
            }
        }

        self.entries.insert(key, Slot::Handler(handler.clone()));

        if is_default {
            self.entries.insert(HintKey::Default, Slot::Handler(handler));
            self.explicit_default = Some(hint.to_string());
        } else {
            self.entries
                .entry(HintKey::Default)
                .or_insert(Slot::Handler(handler));
        }

        if self.named_count() > 1 {
            self.entries
                .entry(HintKey::Selector)
                .or_insert(Slot::Selector);
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &HintKey) -> Option<&Slot<H>> {
        self.entries.get(key)
    }

    /// Handler behind a named hint.
    #[must_use]
    pub fn named(&self, hint: &str) -> Option<&H> {
        match self.entries.get(&HintKey::Named(hint.to_string())) {
            Some(Slot::Handler(handler)) => Some(handler),
            _ => None,
        }
    }

    #[must_use]
    pub fn default_handler(&self) -> Option<&H> {
        match self.entries.get(&HintKey::Default) {
            Some(Slot::Handler(handler)) => Some(handler),
            _ => None,
        }
    }

    /// Named hint flagged default, if any.
    #[must_use]
    pub fn explicit_default(&self) -> Option<&str> {
        self.explicit_default.as_deref()
    }

    #[must_use]
    pub fn has_selector(&self) -> bool {
        self.entries.contains_key(&HintKey::Selector)
    }

    /// User hints in sorted order.
    #[must_use]
    pub fn hints(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter_map(|key| match key {
                HintKey::Named(hint) => Some(hint.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn named_count(&self) -> usize {
        self.entries
            .keys()
            .filter(|key| matches!(key, HintKey::Named(_)))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
