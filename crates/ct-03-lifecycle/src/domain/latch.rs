//! Completion latch for a batch of enqueued preparations.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Tracks which registration indices are still pending.
///
/// Completing an index twice is harmless, so commands re-run by an
/// at-least-once queue count down only once.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    pending: Mutex<BTreeSet<usize>>,
    done: Condvar,
}

impl CompletionLatch {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            pending: Mutex::new(indices.into_iter().collect()),
            done: Condvar::new(),
        }
    }

    pub fn complete(&self, index: usize) {
        let mut pending = self.pending.lock();
        if pending.remove(&index) && pending.is_empty() {
            self.done.notify_all();
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.lock().len()
    }

    /// Block until every index completed or `timeout` elapsed. Returns the
    /// indices still pending, in ascending order.
    pub fn wait(&self, timeout: Option<Duration>) -> Vec<usize> {
        let mut pending = self.pending.lock();
        match timeout {
            None => {
                while !pending.is_empty() {
                    self.done.wait(&mut pending);
                }
            }
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                while !pending.is_empty() {
                    if self.done.wait_until(&mut pending, deadline).timed_out() {
                        break;
                    }
                }
            }
        }
        pending.iter().copied().collect()
    }
}
