//! Handler lifecycle states.

use std::fmt;

/// `New → Wired → Prepared → Disposed`. `Disposed` is terminal and may be
/// reached from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerState {
    /// Created, collaborators not yet bound.
    New,
    /// Context, dependencies and configuration bound; no instance yet.
    Wired,
    /// Instance constructed and published.
    Prepared,
    Disposed,
}

impl HandlerState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disposed)
    }
}

impl fmt::Display for HandlerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Wired => "wired",
            Self::Prepared => "prepared",
            Self::Disposed => "disposed",
        };
        f.write_str(name)
    }
}
