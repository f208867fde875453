//! Failure aggregation for bulk initialization.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::Role;
use thiserror::Error;

use crate::error::{HandlerError, QueueError};

/// What went wrong for one component.
#[derive(Debug, Clone)]
pub enum FailureKind {
    Prepare(HandlerError),
    Enqueue(QueueError),
    /// Still running when the initialization wait ended.
    TimedOut(Duration),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepare(e) => write!(f, "{e}"),
            Self::Enqueue(e) => write!(f, "{e}"),
            Self::TimedOut(limit) => write!(f, "preparation did not finish within {limit:?}"),
        }
    }
}

/// One component that failed to prepare during `initialize()`.
#[derive(Debug, Clone)]
pub struct PreparationFailure {
    /// Registration index of the component.
    pub index: usize,
    pub role: Role,
    pub hint: String,
    pub kind: FailureKind,
}

impl fmt::Display for PreparationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}/{}: {}", self.index, self.role, self.hint, self.kind)
    }
}

/// Every preparation failure of one `initialize()` pass, in registration
/// order.
#[derive(Debug, Clone, Error)]
#[error("{} component(s) failed to initialize: {}", .failures.len(), summarize(.failures))]
pub struct CompositeFailure {
    failures: Vec<PreparationFailure>,
}

fn summarize(failures: &[PreparationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CompositeFailure {
    pub fn failures(&self) -> &[PreparationFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_failures(self) -> Vec<PreparationFailure> {
        self.failures
    }

    /// Sort into registration order; `None` when nothing failed.
    pub fn from_failures(mut failures: Vec<PreparationFailure>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        failures.sort_by_key(|failure| failure.index);
        Some(Self { failures })
    }
}

/// Thread-safe accumulator shared by concurrently running preparations.
///
/// Once closed, late pushes from commands that outlived the initialization
/// wait are dropped.
#[derive(Debug)]
pub struct FailureCollector {
    failures: Mutex<Option<Vec<PreparationFailure>>>,
}

impl Default for FailureCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureCollector {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(Some(Vec::new())),
        }
    }

    /// Returns `false` if the collector was already closed.
    pub fn push(&self, failure: PreparationFailure) -> bool {
        match self.failures.lock().as_mut() {
            Some(failures) => {
                failures.push(failure);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.failures.lock().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.failures.lock().is_none()
    }

    /// Stop accepting failures and return what was collected.
    pub fn close(&self) -> Vec<PreparationFailure> {
        self.failures.lock().take().unwrap_or_default()
    }

    /// Close into a composite, `None` when nothing failed.
    pub fn take_composite(&self) -> Option<CompositeFailure> {
        CompositeFailure::from_failures(self.close())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(index: usize) -> PreparationFailure {
        PreparationFailure {
            index,
            role: Role::new("demo.Logger"),
            hint: format!("h{index}"),
            kind: FailureKind::TimedOut(Duration::from_millis(5)),
        }
    }

    #[test]
    fn test_composite_sorted_by_registration() {
        let collector = FailureCollector::new();
        collector.push(failure(4));
        collector.push(failure(1));

        let composite = collector.take_composite().unwrap();
        let order: Vec<usize> = composite.failures().iter().map(|f| f.index).collect();
        assert_eq!(order, vec![1, 4]);
        assert!(composite.to_string().starts_with("2 component(s) failed"));
        assert!(collector.is_closed());
    }

    #[test]
    fn test_closed_collector_drops_late_failures() {
        let collector = FailureCollector::new();
        assert!(collector.push(failure(0)));
        assert_eq!(collector.close().len(), 1);

        assert!(!collector.push(failure(1)));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_empty_collector_yields_none() {
        assert!(FailureCollector::new().take_composite().is_none());
    }
}
