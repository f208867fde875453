//! # Shared Types Crate
//!
//! This crate contains the component model used across the Citadel
//! container: roles and hints, component metadata, the configuration tree,
//! capability flags, type descriptors and the `Component` contract itself.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Explicit Shapes**: Types describe themselves through a
//!   [`TypeDescriptor`] computed once at registration; nothing is discovered
//!   by introspection at runtime.
//! - **Reserved Hints Are Typed**: The default and selector entries of a role
//!   are variants of [`HintKey`], never user-supplied strings.

pub mod capability;
pub mod component;
pub mod configuration;
pub mod descriptor;
pub mod entities;
pub mod errors;
pub mod resolver;

pub use capability::{Capabilities, Capability};
pub use component::{
    downcast_instance, AsAny, Component, ComponentInstance, ComponentLogger, ComponentType,
    Context, Parameters, ResourceManagers, ServiceLocator, CONTEXT_HINT,
    CONTEXT_INSTRUMENTATION_MANAGER, CONTEXT_LOGGING_MANAGER, CONTEXT_POOL_MANAGER, CONTEXT_ROLE,
};
pub use configuration::Configuration;
pub use descriptor::{
    ComponentInfo, Construction, ConstructorAccess, TypeDescriptor, TypeKind, Visibility,
};
pub use entities::*;
pub use errors::*;
pub use resolver::TypeResolver;
