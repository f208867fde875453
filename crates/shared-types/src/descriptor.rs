//! # Type Descriptors
//!
//! Explicit shape information for every type the container knows about.
//! A descriptor is computed once, when the type is registered in a catalog,
//! and is what the verifiers inspect.
//!
//! `ComponentInfo` is the declared metadata of an implementation: which
//! roles it serves and which dependencies, context entries and schemas it
//! expects.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::capability::{Capabilities, Capability};
use crate::entities::{Role, TypeKey};

/// Structural category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Array,
    Primitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Restricted,
}

/// Availability of a zero-argument constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructorAccess {
    Public,
    Restricted,
    Missing,
}

/// Shape of a registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    key: TypeKey,
    kind: TypeKind,
    visibility: Visibility,
    is_abstract: bool,
    constructor: ConstructorAccess,
    capabilities: Capabilities,
    supertypes: BTreeSet<TypeKey>,
}

impl TypeDescriptor {
    fn with_kind(key: impl Into<TypeKey>, kind: TypeKind, constructor: ConstructorAccess) -> Self {
        Self {
            key: key.into(),
            kind,
            visibility: Visibility::Public,
            is_abstract: false,
            constructor,
            capabilities: Capabilities::new(),
            supertypes: BTreeSet::new(),
        }
    }

    /// A public, concrete class with a public zero-argument constructor.
    pub fn class(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Class, ConstructorAccess::Public)
    }

    /// A public interface type, the shape every role must have.
    pub fn interface(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Interface, ConstructorAccess::Missing)
    }

    pub fn array(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Array, ConstructorAccess::Missing)
    }

    pub fn primitive(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Primitive, ConstructorAccess::Missing)
    }

    /// Interface descriptor for a role.
    pub fn role(role: &Role) -> Self {
        Self::interface(role.type_key())
    }

    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        for capability in capabilities {
            self.capabilities.insert(capability);
        }
        self
    }

    /// Declare that this type satisfies `role`.
    #[must_use]
    pub fn implements(mut self, role: impl Into<Role>) -> Self {
        self.supertypes.insert(role.into().type_key());
        self
    }

    #[must_use]
    pub fn extends(mut self, supertype: impl Into<TypeKey>) -> Self {
        self.supertypes.insert(supertype.into());
        self
    }

    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn restricted(mut self) -> Self {
        self.visibility = Visibility::Restricted;
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: ConstructorAccess) -> Self {
        self.constructor = constructor;
        self
    }

    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[must_use]
    pub fn constructor(&self) -> ConstructorAccess {
        self.constructor
    }

    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn supertypes(&self) -> impl Iterator<Item = &TypeKey> {
        self.supertypes.iter()
    }

    /// A type is assignable to itself and to each declared supertype.
    #[must_use]
    pub fn is_assignable_to(&self, target: &TypeKey) -> bool {
        &self.key == target || self.supertypes.contains(target)
    }
}

/// How the container obtains instances of an implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Construction {
    /// Through its public zero-argument constructor.
    #[default]
    Direct,
    /// Through an external factory; the class itself need not be buildable.
    Factory,
}

/// Declared metadata of a component implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    #[serde(default)]
    pub services: Vec<Role>,
    #[serde(default)]
    pub dependencies: Vec<Role>,
    #[serde(default)]
    pub context_entries: Vec<String>,
    #[serde(default)]
    pub configuration_schema: Option<String>,
    #[serde(default)]
    pub parameters_schema: Option<String>,
    #[serde(default)]
    pub construction: Construction,
}

impl ComponentInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn service(mut self, role: impl Into<Role>) -> Self {
        self.services.push(role.into());
        self
    }

    #[must_use]
    pub fn dependency(mut self, role: impl Into<Role>) -> Self {
        self.dependencies.push(role.into());
        self
    }

    #[must_use]
    pub fn context_entry(mut self, key: impl Into<String>) -> Self {
        self.context_entries.push(key.into());
        self
    }

    #[must_use]
    pub fn configuration_schema(mut self, schema: impl Into<String>) -> Self {
        self.configuration_schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn parameters_schema(mut self, schema: impl Into<String>) -> Self {
        self.parameters_schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn constructed_by_factory(mut self) -> Self {
        self.construction = Construction::Factory;
        self
    }

    /// Whether the implementation must be directly constructible.
    #[must_use]
    pub fn is_buildable(&self) -> bool {
        self.construction == Construction::Direct
    }
}
