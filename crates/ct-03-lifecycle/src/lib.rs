//! # CT-03 Lifecycle
//!
//! Builds, prepares and disposes the components of a container.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `ComponentHandler` state machine,
//!   `HandlerEntry`, `RoleManager`, failure aggregation, lifecycle extensions
//! - **Ports Layer** (`ports/`): `RoleResolver`, `ObjectFactory`,
//!   `CommandQueue`, `AdmissionCheck`
//! - **Adapters Layer** (`adapters/`): `TypeCatalog`, `DefaultObjectFactory`,
//!   inline/rayon/tokio command queues
//! - **Service Layer** (`service/`): `LifecycleOrchestrator`
//!
//! ## Handler States
//!
//! ```text
//! New ──wire──→ Wired ──prepare──→ Prepared
//!                 │                   │
//!                 └──────dispose──────┴──→ Disposed
//! ```
//!
//! A failed preparation leaves the handler `Wired`, so a later lookup
//! retries. `Disposed` is terminal.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ct_03_lifecycle::{DefaultObjectFactory, LifecycleOrchestrator, RoleManager, TypeCatalog};
//!
//! let catalog = Arc::new(TypeCatalog::new());
//! catalog.register::<ConsoleLogger>()?;
//!
//! let orchestrator = LifecycleOrchestrator::builder(
//!     Arc::new(roles),
//!     catalog.clone(),
//!     Arc::new(DefaultObjectFactory::new(catalog)),
//! )
//! .build();
//!
//! orchestrator.add_component(ComponentMetadata::simple("console", "demo.ConsoleLogger", Activation::Eager))?;
//! orchestrator.initialize()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{
    DefaultObjectFactory, InlineCommandQueue, RayonCommandQueue, TokioCommandQueue, TypeCatalog,
};
pub use domain::{
    ComponentHandler, CompositeFailure, FailureKind, HandlerEntry, HandlerState,
    LifecycleExtension, LifecycleExtensions, PreparationFailure, RoleEntry, RoleError,
    RoleManager,
};
pub use error::{
    AdmissionError, CatalogError, CreationCause, FactoryError, HandlerError, OrchestratorError,
    QueueError,
};
pub use metrics::{LifecycleMetrics, LifecycleMetricsSnapshot};
pub use ports::{AdmissionCheck, Command, CommandQueue, CreationContext, ObjectFactory, RoleResolver};
pub use service::{DisposalSummary, LifecycleOrchestrator, OrchestratorBuilder, RegistryLocator};
