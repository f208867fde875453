//! # CT-02 Component Verifier
//!
//! Checks that a component implementation and the roles it claims to serve
//! satisfy the container's structural contract, before the container admits
//! the component.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `VerifyRule`, one variant per check
//! - **Service Layer** (`service/`):
//!   - `StructuralVerifier`: shape checks on type descriptors
//!   - `MetadataVerifier`: resolves declared types through a `TypeResolver`
//!     and rejects declarations the implementation cannot honor
//!
//! ## Check Order
//!
//! `verify_component` runs, failing fast:
//!
//! 1. class shape (only for directly constructed implementations)
//! 2. lifecycle compatibility
//! 3. service shape, per role
//! 4. implementation assignable to every role
//!
//! `MetadataVerifier::verify_type` then adds the surplus-declaration checks.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::VerifyRule;
pub use error::VerifyError;
pub use service::{MetadataVerifier, StructuralVerifier};
