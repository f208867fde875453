//! Domain Layer
//!
//! The catalogue of verification rules.

pub mod rules;

pub use rules::VerifyRule;
