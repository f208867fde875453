//! Port for resolving type keys to descriptors.

use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::entities::TypeKey;
use crate::errors::TypeNotFound;

/// Resolves a [`TypeKey`] to the descriptor registered for it.
pub trait TypeResolver: Send + Sync {
    fn load_type(&self, key: &TypeKey) -> Result<Arc<TypeDescriptor>, TypeNotFound>;

    fn contains(&self, key: &TypeKey) -> bool {
        self.load_type(key).is_ok()
    }
}
