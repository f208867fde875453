//! # Cross-Crate Scenarios
//!
//! Each module drives the public container surface end to end.

pub mod assembly;
pub mod lifecycle;
pub mod registry;
pub mod verifier;
