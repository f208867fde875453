//! Type catalog.
//!
//! Explicit registry of every type the container can resolve, and of the
//! constructor closures for the ones it can build. Implements the
//! `TypeResolver` port.
//!
//! A key is registered once. Registering it again fails with
//! [`CatalogError::Duplicate`] and the first registration stays.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{
    Component, ComponentType, Role, TypeDescriptor, TypeKey, TypeNotFound, TypeResolver,
};
use tracing::{debug, warn};

use crate::error::{CatalogError, FactoryError};

/// Builds a fresh, unconfigured component.
pub type Constructor = Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>;

struct CatalogEntry {
    descriptor: Arc<TypeDescriptor>,
    constructor: Option<Constructor>,
}

/// Registry of type descriptors and constructors.
#[derive(Default)]
pub struct TypeCatalog {
    types: RwLock<HashMap<TypeKey, CatalogEntry>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &self,
        descriptor: TypeDescriptor,
        constructor: Option<Constructor>,
    ) -> Result<&Self, CatalogError> {
        let key = descriptor.key().clone();
        let mut types = self.types.write();
        if types.contains_key(&key) {
            warn!(type_key = %key, "[TypeCatalog] duplicate registration rejected");
            return Err(CatalogError::Duplicate(key));
        }
        types.insert(
            key.clone(),
            CatalogEntry {
                descriptor: Arc::new(descriptor),
                constructor,
            },
        );
        debug!(type_key = %key, "[TypeCatalog] registered type");
        Ok(self)
    }

    /// Register a self-describing component type.
    pub fn register<T: ComponentType>(&self) -> Result<&Self, CatalogError> {
        let constructor: Constructor = Arc::new(|| Box::new(T::default()) as Box<dyn Component>);
        self.insert(T::descriptor(), Some(constructor))
    }

    /// Register a descriptor with an explicit constructor.
    pub fn register_component<F>(
        &self,
        descriptor: TypeDescriptor,
        constructor: F,
    ) -> Result<&Self, CatalogError>
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        let constructor: Constructor = Arc::new(constructor);
        self.insert(descriptor, Some(constructor))
    }

    /// Register a descriptor the catalog cannot construct (roles, types
    /// built by external factories).
    pub fn register_type(&self, descriptor: TypeDescriptor) -> Result<&Self, CatalogError> {
        self.insert(descriptor, None)
    }

    /// Register the interface type of a role.
    pub fn register_role(&self, role: &Role) -> Result<&Self, CatalogError> {
        self.register_type(TypeDescriptor::role(role))
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.read().contains_key(key)
    }

    pub fn has_constructor(&self, key: &TypeKey) -> bool {
        self.types
            .read()
            .get(key)
            .is_some_and(|entry| entry.constructor.is_some())
    }

    pub fn construct(&self, key: &TypeKey) -> Result<Box<dyn Component>, FactoryError> {
        let constructor = self
            .types
            .read()
            .get(key)
            .and_then(|entry| entry.constructor.clone())
            .ok_or_else(|| FactoryError::NoConstructor(key.clone()))?;
        Ok(constructor())
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.types.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl TypeResolver for TypeCatalog {
    fn load_type(&self, key: &TypeKey) -> Result<Arc<TypeDescriptor>, TypeNotFound> {
        self.types
            .read()
            .get(key)
            .map(|entry| Arc::clone(&entry.descriptor))
            .ok_or_else(|| TypeNotFound(key.clone()))
    }
}
