//! Service Layer
//!
//! The concurrent registry implementing the `HandlerDirectory` port.

pub mod handler_registry;

pub use handler_registry::HandlerRegistry;
