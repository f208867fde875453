//! Ports Layer
//!
//! Driving port used by the lifecycle orchestrator and the container facade.

pub mod inbound;

pub use inbound::HandlerDirectory;
