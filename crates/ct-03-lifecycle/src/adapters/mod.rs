//! Adapters Layer
//!
//! Concrete implementations of the outbound ports: the type catalog, the
//! capability-driven object factory and the command queues.

pub mod catalog;
pub mod factory;
pub mod queues;

pub use catalog::{Constructor, TypeCatalog};
pub use factory::DefaultObjectFactory;
pub use queues::{InlineCommandQueue, RayonCommandQueue, TokioCommandQueue};
