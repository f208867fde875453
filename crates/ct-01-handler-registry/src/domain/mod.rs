//! Domain Layer
//!
//! Pure data structures for hint resolution. No locking, no I/O.

pub mod hint_map;
pub mod selector;

pub use hint_map::{HintMap, Slot};
pub use selector::{Resolved, Selector};
