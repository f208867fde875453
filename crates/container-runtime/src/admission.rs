//! Metadata verification as a registration gate.

use std::sync::Arc;

use ct_02_component_verifier::MetadataVerifier;
use ct_03_lifecycle::{AdmissionCheck, AdmissionError, RoleEntry};
use shared_types::{ComponentMetadata, TypeResolver};

/// Rejects components whose implementation or declared services fail the
/// metadata verifier.
pub struct VerifierAdmission {
    verifier: MetadataVerifier,
}

impl VerifierAdmission {
    pub fn new(types: Arc<dyn TypeResolver>) -> Self {
        Self {
            verifier: MetadataVerifier::new(types),
        }
    }
}

impl AdmissionCheck for VerifierAdmission {
    fn admit(&self, entry: &RoleEntry, metadata: &ComponentMetadata) -> Result<(), AdmissionError> {
        self.verifier
            .verify_type(metadata.hint(), metadata.implementation(), entry.info())
            .map_err(|error| Box::new(error) as AdmissionError)
    }
}

impl std::fmt::Debug for VerifierAdmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierAdmission").finish_non_exhaustive()
    }
}
