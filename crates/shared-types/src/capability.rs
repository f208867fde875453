//! # Lifecycle Capabilities
//!
//! Flags a type declares to opt into lifecycle stages. The container runs a
//! stage only when the matching flag is present, and the verifiers reason
//! about compatibility purely from these flags.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One lifecycle capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// Receives a component logger.
    LogEnabled,
    /// Receives the container context.
    Contextualizable,
    /// Holds a service locator and pulls dependencies on demand.
    DependencyPull,
    /// Has its dependencies resolved once during construction.
    DependencyInjection,
    /// Receives its configuration tree.
    Configurable,
    /// Receives flat name/value parameters.
    Parameterizable,
    Initializable,
    Startable,
    Suspendable,
    Disposable,
}

impl Capability {
    /// Every capability, in lifecycle order.
    pub const ALL: [Capability; 10] = [
        Self::LogEnabled,
        Self::Contextualizable,
        Self::DependencyPull,
        Self::DependencyInjection,
        Self::Configurable,
        Self::Parameterizable,
        Self::Initializable,
        Self::Startable,
        Self::Suspendable,
        Self::Disposable,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LogEnabled => "LogEnabled",
            Self::Contextualizable => "Contextualizable",
            Self::DependencyPull => "DependencyPull",
            Self::DependencyInjection => "DependencyInjection",
            Self::Configurable => "Configurable",
            Self::Parameterizable => "Parameterizable",
            Self::Initializable => "Initializable",
            Self::Startable => "Startable",
            Self::Suspendable => "Suspendable",
            Self::Disposable => "Disposable",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Whether every capability in `pair` is present.
    #[must_use]
    pub fn contains_all(&self, pair: &[Capability]) -> bool {
        pair.iter().all(|c| self.contains(*c))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Capability::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_operations() {
        let caps = Capabilities::new()
            .with(Capability::Configurable)
            .with(Capability::Initializable)
            .with(Capability::Configurable);
        assert_eq!(caps.len(), 2);
        assert!(caps.contains(Capability::Configurable));
        assert!(!caps.contains(Capability::Disposable));
        assert!(caps.contains_all(&[Capability::Configurable, Capability::Initializable]));
        assert_eq!(caps.to_string(), "[Configurable, Initializable]");
    }

    #[test]
    fn test_iteration_follows_lifecycle_order() {
        let caps: Capabilities = [Capability::Disposable, Capability::LogEnabled]
            .into_iter()
            .collect();
        let order: Vec<_> = caps.iter().collect();
        assert_eq!(order, vec![Capability::LogEnabled, Capability::Disposable]);
    }
}
