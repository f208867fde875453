//! Ports Layer
//!
//! Driven ports only; the orchestrator itself is the driving surface.

pub mod outbound;

pub use outbound::{
    AdmissionCheck, Command, CommandQueue, CreationContext, ObjectFactory, RoleResolver,
};
