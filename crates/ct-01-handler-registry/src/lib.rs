//! # CT-01 Handler Registry
//!
//! Maps `(role, hint)` pairs to handlers. Each role owns a hint map with two
//! container-managed entries next to the user hints:
//!
//! - **Default** (`"*"`): the handler returned when no hint is given and the
//!   role has a single implementation.
//! - **Selector** (`"$"`): synthesized as soon as a role has more than one
//!   hint; a hint-less lookup then yields a [`Selector`] over all of them.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `HintMap`, `Slot`, `Selector`, `Resolved`
//! - **Ports Layer** (`ports/`): `HandlerDirectory` (driving port)
//! - **Service Layer** (`service/`): `HandlerRegistry`, copy-on-write per role
//!
//! ## Invariants
//!
//! - **Reserved hints**: `"*"` and `"$"` can never be registered.
//! - **Selector**: a role with more than one hint always has a selector.
//! - **Default**: the first registered hint is the default unless an entry
//!   is flagged default, which wins regardless of registration order. At most
//!   one entry per role may carry the flag.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ct_01_handler_registry::{HandlerDirectory, HandlerRegistry, Resolved};
//! use shared_types::Role;
//!
//! let registry = HandlerRegistry::new();
//! let role = Role::new("citadel.demo.Logger");
//! registry.register(&role, "console", console_handler, true)?;
//! registry.register(&role, "file", file_handler, false)?;
//!
//! match registry.lookup(&role, None)? {
//!     Resolved::Selector(selector) => assert_eq!(selector.hints(), ["console", "file"]),
//!     Resolved::Handler(_) => unreachable!(),
//! }
//! ```

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{HintMap, Resolved, Selector, Slot};
pub use error::RegistryError;
pub use ports::HandlerDirectory;
pub use service::HandlerRegistry;
