//! # Component Contract
//!
//! Every hosted component implements [`Component`]. The lifecycle methods
//! all have no-op defaults; the container only calls the ones whose
//! [`Capability`](crate::Capability) the component's descriptor declares.
//!
//! ## Stage Order
//!
//! ```text
//! construct → enable_logging → contextualize → service | inject
//!           → configure | parameterize → initialize → start
//!           ...
//!           → stop → dispose
//! ```
//!
//! Everything up to `start` runs on an exclusively owned instance. Once the
//! instance is published it is shared as a [`ComponentInstance`], so `stop`
//! and `dispose` take `&self`.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::configuration::Configuration;
use crate::descriptor::TypeDescriptor;
use crate::entities::Role;
use crate::errors::{ConfigurationError, LifecycleError, LifecycleStage, LookupError};

/// Context key holding the role a component was registered under.
pub const CONTEXT_ROLE: &str = "citadel.role";
/// Context key holding the hint a component was registered under.
pub const CONTEXT_HINT: &str = "citadel.hint";
pub const CONTEXT_LOGGING_MANAGER: &str = "citadel.resources.logging";
pub const CONTEXT_INSTRUMENTATION_MANAGER: &str = "citadel.resources.instrumentation";
pub const CONTEXT_POOL_MANAGER: &str = "citadel.resources.pooling";

/// Upcast helper so shared instances can be downcast to their concrete type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A component hosted by the container.
pub trait Component: AsAny {
    fn enable_logging(&mut self, _logger: ComponentLogger) {}

    fn contextualize(&mut self, _context: &Context) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// Dependency pull: keep the locator and look dependencies up on demand.
    fn service(&mut self, _locator: Arc<dyn ServiceLocator>) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// Dependency injection: resolve dependencies now, do not keep the locator.
    fn inject(&mut self, _locator: &dyn ServiceLocator) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn configure(&mut self, _configuration: &Configuration) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn parameterize(&mut self, _parameters: &Parameters) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn dispose(&self) -> Result<(), LifecycleError> {
        Ok(())
    }
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").finish_non_exhaustive()
    }
}

/// A published, shared component instance.
pub type ComponentInstance = Arc<dyn Component>;

/// Downcast a shared instance to its concrete type.
#[must_use]
pub fn downcast_instance<T: Component>(instance: &ComponentInstance) -> Option<Arc<T>> {
    Arc::clone(instance).into_any_arc().downcast::<T>().ok()
}

/// A component type the catalog can construct and describe on its own.
pub trait ComponentType: Component + Default {
    fn descriptor() -> TypeDescriptor;
}

// =============================================================================
// COLLABORATORS HANDED TO COMPONENTS
// =============================================================================

/// Logger bound to one component, emitting `tracing` events tagged with
/// the component's role and hint.
#[derive(Debug, Clone)]
pub struct ComponentLogger {
    role: String,
    hint: String,
}

impl ComponentLogger {
    pub fn new(role: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            hint: hint.into(),
        }
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(role = %self.role, hint = %self.hint, "{}", message);
    }

    pub fn info(&self, message: &str) {
        tracing::info!(role = %self.role, hint = %self.hint, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(role = %self.role, hint = %self.hint, "{}", message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!(role = %self.role, hint = %self.hint, "{}", message);
    }
}

/// Shared, read-mostly key/value context handed to contextualizable
/// components.
#[derive(Clone, Default)]
pub struct Context {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Arc::new(value));
    }

    pub fn put_shared(&mut self, key: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.entries.insert(key.into(), value);
    }

    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.put(key, value);
        self
    }

    /// Typed entry, `None` when missing or of another type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.entries
            .get(key)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Typed entry a component cannot work without.
    pub fn require<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, LifecycleError> {
        self.get(key).ok_or_else(|| {
            LifecycleError::failed(
                LifecycleStage::Contextualize,
                format!("missing context entry '{key}'"),
            )
        })
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` into this context, overwriting duplicates.
    pub fn extend_from(&mut self, other: &Context) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), Arc::clone(value));
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

/// Opaque resource managers threaded into every component the container
/// builds.
#[derive(Clone, Default)]
pub struct ResourceManagers {
    pub logging: Option<Arc<dyn Any + Send + Sync>>,
    pub instrumentation: Option<Arc<dyn Any + Send + Sync>>,
    pub pooling: Option<Arc<dyn Any + Send + Sync>>,
}

impl ResourceManagers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_logging<T: Any + Send + Sync>(mut self, manager: T) -> Self {
        self.logging = Some(Arc::new(manager));
        self
    }

    #[must_use]
    pub fn with_instrumentation<T: Any + Send + Sync>(mut self, manager: T) -> Self {
        self.instrumentation = Some(Arc::new(manager));
        self
    }

    #[must_use]
    pub fn with_pooling<T: Any + Send + Sync>(mut self, manager: T) -> Self {
        self.pooling = Some(Arc::new(manager));
        self
    }

    /// Publish the present managers under their well-known context keys.
    pub fn install_into(&self, context: &mut Context) {
        let managers = [
            (CONTEXT_LOGGING_MANAGER, &self.logging),
            (CONTEXT_INSTRUMENTATION_MANAGER, &self.instrumentation),
            (CONTEXT_POOL_MANAGER, &self.pooling),
        ];
        for (key, manager) in managers {
            if let Some(manager) = manager {
                context.put_shared(key, Arc::clone(manager));
            }
        }
    }
}

impl fmt::Debug for ResourceManagers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceManagers")
            .field("logging", &self.logging.is_some())
            .field("instrumentation", &self.instrumentation.is_some())
            .field("pooling", &self.pooling.is_some())
            .finish()
    }
}

/// Flat name/value parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `<parameter name=".." value=".."/>` children.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigurationError> {
        let mut parameters = Self::new();
        for child in configuration.children_named("parameter") {
            let name = child.attribute("name")?;
            let value = child.attribute("value")?;
            parameters.0.insert(name.to_string(), value.to_string());
        }
        Ok(parameters)
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn get_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|raw| raw.trim().parse().ok())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lookup surface handed to components that depend on other components.
pub trait ServiceLocator: Send + Sync {
    fn lookup(&self, role: &Role, hint: Option<&str>) -> Result<ComponentInstance, LookupError>;

    fn has(&self, role: &Role, hint: Option<&str>) -> bool;
}
