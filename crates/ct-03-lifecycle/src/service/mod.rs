//! Lifecycle Service - registration, initialization and disposal
//!
//! # Architecture
//! - Handlers are wired at registration, constructed on preparation
//! - Eager preparation fans out over the command queue
//! - Dependencies resolve through a locator bound to the registry

mod commands;
mod locator;
mod orchestrator;

pub use commands::PrepareHandlerCommand;
pub use locator::{EntryRegistry, RegistryLocator};
pub use orchestrator::{DisposalSummary, LifecycleOrchestrator, OrchestratorBuilder};
