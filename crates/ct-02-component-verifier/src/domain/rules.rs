//! Verification rules.
//!
//! Every check has its own variant so callers can tell failures apart
//! without parsing messages.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyRule {
    // Class shape, in evaluation order
    MissingNoArgConstructor,
    NonPublicConstructor,
    AbstractClass,
    ArrayClass,
    InterfaceClass,
    PrimitiveClass,
    NonPublicClass,

    // Lifecycle compatibility
    IncompatibleDependencyCapabilities,
    IncompatibleConfigurationCapabilities,

    // Service shape
    ServiceNotInterface,
    ServiceNotPublic,
    ServiceIsLifecycle,
    ServiceNotImplemented,

    // Surplus declarations
    UnneededDependencies,
    UnneededContextEntries,
    UnneededConfigurationSchema,
    UnneededParametersSchema,
}

impl VerifyRule {
    /// Stable diagnostic code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingNoArgConstructor => "CV-101",
            Self::NonPublicConstructor => "CV-102",
            Self::AbstractClass => "CV-103",
            Self::ArrayClass => "CV-104",
            Self::InterfaceClass => "CV-105",
            Self::PrimitiveClass => "CV-106",
            Self::NonPublicClass => "CV-107",
            Self::IncompatibleDependencyCapabilities => "CV-201",
            Self::IncompatibleConfigurationCapabilities => "CV-202",
            Self::ServiceNotInterface => "CV-301",
            Self::ServiceNotPublic => "CV-302",
            Self::ServiceIsLifecycle => "CV-303",
            Self::ServiceNotImplemented => "CV-304",
            Self::UnneededDependencies => "CV-401",
            Self::UnneededContextEntries => "CV-402",
            Self::UnneededConfigurationSchema => "CV-403",
            Self::UnneededParametersSchema => "CV-404",
        }
    }

    /// Whether the rule belongs to the class-shape group.
    #[must_use]
    pub fn is_class_rule(&self) -> bool {
        self.code().starts_with("CV-1")
    }
}

impl fmt::Display for VerifyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}
