//! Lifecycle counters
//!
//! Thread-safe counters for registration, preparation and disposal. The
//! container facade mirrors them into Prometheus; tests read them through
//! [`LifecycleMetrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for component lifecycle events
#[derive(Debug, Default)]
pub struct LifecycleMetrics {
    /// Components successfully registered
    pub components_registered: AtomicU64,
    /// Registrations rejected for any reason
    pub registration_failures: AtomicU64,
    /// Underlying component constructions
    pub constructions: AtomicU64,
    /// Preparations that failed, timed out or could not be enqueued
    pub preparation_failures: AtomicU64,
    /// Lazy components materialized by a lookup
    pub lazy_materializations: AtomicU64,
    /// Handlers disposed without error
    pub disposals: AtomicU64,
    /// Handlers whose disposal reported an error
    pub disposal_failures: AtomicU64,
}

impl LifecycleMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_registration(&self) {
        self.components_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration_failure(&self) {
        self.registration_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_construction(&self) {
        self.constructions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preparation_failure(&self) {
        self.preparation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lazy_materialization(&self) {
        self.lazy_materializations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one handler disposal
    pub fn record_disposal(&self, ok: bool) {
        if ok {
            self.disposals.fetch_add(1, Ordering::Relaxed);
        } else {
            self.disposal_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> LifecycleMetricsSnapshot {
        LifecycleMetricsSnapshot {
            components_registered: self.components_registered.load(Ordering::Relaxed),
            registration_failures: self.registration_failures.load(Ordering::Relaxed),
            constructions: self.constructions.load(Ordering::Relaxed),
            preparation_failures: self.preparation_failures.load(Ordering::Relaxed),
            lazy_materializations: self.lazy_materializations.load(Ordering::Relaxed),
            disposals: self.disposals.load(Ordering::Relaxed),
            disposal_failures: self.disposal_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`LifecycleMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleMetricsSnapshot {
    pub components_registered: u64,
    pub registration_failures: u64,
    pub constructions: u64,
    pub preparation_failures: u64,
    pub lazy_materializations: u64,
    pub disposals: u64,
    pub disposal_failures: u64,
}

impl LifecycleMetricsSnapshot {
    /// Handlers a `dispose()` pass has visited
    pub fn disposal_attempts(&self) -> u64 {
        self.disposals + self.disposal_failures
    }
}
