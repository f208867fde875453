//! Command queue adapters.
//!
//! - [`InlineCommandQueue`]: runs each command on the caller's thread.
//! - [`RayonCommandQueue`]: dedicated rayon pool for CPU-bound preparation.
//! - [`TokioCommandQueue`]: tokio's blocking pool, for containers embedded
//!   in an async service.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::runtime::Handle;
use tracing::{error, trace};

use crate::error::{panic_message, QueueError};
use crate::ports::{Command, CommandQueue};

/// Executes commands synchronously inside `enqueue`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineCommandQueue;

impl CommandQueue for InlineCommandQueue {
    fn enqueue(&self, command: Arc<dyn Command>) -> Result<(), QueueError> {
        command.execute();
        Ok(())
    }
}

/// Runs commands on a private rayon thread pool.
pub struct RayonCommandQueue {
    pool: ThreadPool,
}

impl RayonCommandQueue {
    /// `threads == 0` lets rayon pick one thread per core.
    pub fn new(threads: usize) -> Result<Self, QueueError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("citadel-prepare-{i}"))
            .panic_handler(|payload| {
                error!(panic = %panic_message(payload.as_ref()), "[RayonQueue] command panicked");
            })
            .build()
            .map_err(|e| QueueError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl CommandQueue for RayonCommandQueue {
    fn enqueue(&self, command: Arc<dyn Command>) -> Result<(), QueueError> {
        trace!(command = %command.describe(), "[RayonQueue] enqueued");
        self.pool.spawn(move || command.execute());
        Ok(())
    }
}

impl std::fmt::Debug for RayonCommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonCommandQueue")
            .field("threads", &self.threads())
            .finish()
    }
}

/// Runs commands on the blocking pool of a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioCommandQueue {
    handle: Handle,
}

impl TokioCommandQueue {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is running in.
    pub fn current() -> Result<Self, QueueError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| QueueError::Unavailable(e.to_string()))
    }
}

impl CommandQueue for TokioCommandQueue {
    fn enqueue(&self, command: Arc<dyn Command>) -> Result<(), QueueError> {
        trace!(command = %command.describe(), "[TokioQueue] enqueued");
        // Detached; completion is observed through the command itself.
        drop(self.handle.spawn_blocking(move || command.execute()));
        Ok(())
    }
}
