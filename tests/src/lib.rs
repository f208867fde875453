//! # Citadel Test Suite
//!
//! Cross-crate scenarios and benchmarks for the component container.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs      # Configurable widget component and containers
//! │   └── scenarios/       # End-to-end behavior through the container
//! │       ├── registry.rs  # Selectors, defaults, reserved hints
//! │       ├── verifier.rs  # Class shape and declaration rules
//! │       ├── lifecycle.rs # Bulk init, disposal, concurrent lazy lookup
//! │       └── assembly.rs  # Configuration-driven demo flow
//! └── benches/
//!     └── container_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All scenarios
//! cargo test -p ct-tests
//!
//! # By area
//! cargo test -p ct-tests scenarios::lifecycle::
//!
//! # Benchmarks
//! cargo bench -p ct-tests
//! ```

pub mod fixtures;
pub mod scenarios;
