//! Domain Layer
//!
//! This layer contains:
//! - The handler state machine and build-once preparation
//! - Registered entries
//! - Failure aggregation and the completion latch
//! - Lifecycle extensions
//! - The role manager
//!
//! RULES:
//! - No async code
//! - No direct dependency on concrete queues or factories

pub mod entry;
pub mod extensions;
pub mod failures;
pub mod handler;
pub mod latch;
pub mod roles;
pub mod state;

pub use entry::HandlerEntry;
pub use extensions::{LifecycleExtension, LifecycleExtensions};
pub use failures::{CompositeFailure, FailureCollector, FailureKind, PreparationFailure};
pub use handler::ComponentHandler;
pub use latch::CompletionLatch;
pub use roles::{RoleEntry, RoleError, RoleManager};
pub use state::HandlerState;
