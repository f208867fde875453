//! Preparation command enqueued by `initialize()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    CompletionLatch, FailureCollector, FailureKind, HandlerEntry, PreparationFailure,
};
use crate::metrics::LifecycleMetrics;
use crate::ports::Command;

/// Prepares one eager handler and counts the latch down.
///
/// Safe under at-least-once delivery: only the first execution prepares.
pub struct PrepareHandlerCommand {
    entry: Arc<HandlerEntry>,
    failures: Arc<FailureCollector>,
    latch: Arc<CompletionLatch>,
    metrics: Arc<LifecycleMetrics>,
    executed: AtomicBool,
}

impl PrepareHandlerCommand {
    pub fn new(
        entry: Arc<HandlerEntry>,
        failures: Arc<FailureCollector>,
        latch: Arc<CompletionLatch>,
        metrics: Arc<LifecycleMetrics>,
    ) -> Self {
        Self {
            entry,
            failures,
            latch,
            metrics,
            executed: AtomicBool::new(false),
        }
    }

    pub fn entry(&self) -> &Arc<HandlerEntry> {
        &self.entry
    }
}

/// Counts the latch down when dropped, including during unwinding.
struct CompleteOnDrop<'a> {
    latch: &'a CompletionLatch,
    index: usize,
}

impl Drop for CompleteOnDrop<'_> {
    fn drop(&mut self) {
        self.latch.complete(self.index);
    }
}

/// Prepare `entry`, recording a failure in `failures`.
pub(crate) fn prepare_entry(
    entry: &HandlerEntry,
    failures: &FailureCollector,
    metrics: &LifecycleMetrics,
) {
    match entry.handler().prepare() {
        Ok(_) => debug!(
            role = %entry.role(),
            hint = entry.hint(),
            "[Orchestrator] eager component prepared"
        ),
        Err(error) => {
            warn!(
                role = %entry.role(),
                hint = entry.hint(),
                error = %error,
                "[Orchestrator] eager component failed to prepare"
            );
            metrics.record_preparation_failure();
            failures.push(PreparationFailure {
                index: entry.index(),
                role: entry.role().clone(),
                hint: entry.hint().to_string(),
                kind: FailureKind::Prepare(error),
            });
        }
    }
}

impl Command for PrepareHandlerCommand {
    fn execute(&self) {
        if self.executed.swap(true, Ordering::AcqRel) {
            debug!(command = %self.describe(), "[Orchestrator] duplicate execution ignored");
            return;
        }
        let _complete = CompleteOnDrop {
            latch: &self.latch,
            index: self.entry.index(),
        };
        prepare_entry(&self.entry, &self.failures, &self.metrics);
    }

    fn describe(&self) -> String {
        format!("prepare {}/{}", self.entry.role(), self.entry.hint())
    }
}
