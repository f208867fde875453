//! Service Layer
//!
//! - `StructuralVerifier`: pure shape checks
//! - `MetadataVerifier`: resolver-backed checks of declared metadata

pub mod metadata;
pub mod structural;

pub use metadata::MetadataVerifier;
pub use structural::StructuralVerifier;
