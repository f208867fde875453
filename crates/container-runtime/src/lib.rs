//! # Container Runtime
//!
//! The Citadel container facade. Wires the handler registry, the component
//! verifier and the lifecycle orchestrator into one [`Container`].
//!
//! ## Modules
//!
//! - `config` - `ContainerConfig`, loaded from the environment
//! - `container` - `Container` and `ContainerBuilder`
//! - `admission` - metadata verification as a registration gate
//! - `assembly` - building components from a configuration tree
//! - `demo` - sample loggers and a greeter used by the `citadel` binary
//!
//! ## Usage
//!
//! ```rust,ignore
//! use container_runtime::{assemble, demo, Container, ContainerConfig};
//!
//! let catalog = Arc::new(TypeCatalog::new());
//! demo::register_types(&catalog)?;
//!
//! let container = Container::builder(ContainerConfig::from_env()?)
//!     .catalog(catalog)
//!     .roles(Arc::new(demo::role_manager()?))
//!     .build()?;
//!
//! assemble(&container, &demo::container_configuration()?);
//! container.initialize()?;
//! let greeter = container.component::<demo::Greeter>(&Role::new(demo::GREETER_ROLE), None)?;
//! greeter.greet("world")?;
//! container.dispose();
//! ```

pub mod admission;
pub mod assembly;
pub mod config;
pub mod container;
pub mod demo;
pub mod error;

pub use admission::VerifierAdmission;
pub use assembly::{assemble, load_configuration, AssemblyFailure, AssemblyReport};
pub use config::{ConfigError, ContainerConfig};
pub use container::{ComponentStatus, Container, ContainerBuilder};
pub use error::ContainerError;
