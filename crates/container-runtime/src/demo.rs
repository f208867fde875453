//! # Demo Components
//!
//! Two loggers under one role and a greeter that pulls a logger from the
//! container. Used by the `citadel` binary and by the scenario tests.
//!
//! ```text
//! citadel.demo.Logger    console (default)   ConsoleLogger
//!                        file                FileLogger
//! citadel.demo.Greeter   greeter             DefaultGreeter ──pull──→ Logger
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use ct_03_lifecycle::{CatalogError, RoleError, RoleManager, TypeCatalog};
use parking_lot::Mutex;
use shared_types::{
    downcast_instance, Capability, Component, ComponentInstance, ComponentLogger, ComponentType,
    Configuration, LifecycleError, LifecycleStage, Parameters, Role, ServiceLocator,
    TypeDescriptor,
};

pub const LOGGER_ROLE: &str = "citadel.demo.Logger";
pub const GREETER_ROLE: &str = "citadel.demo.Greeter";

pub const CONSOLE_LOGGER: &str = "citadel.demo.ConsoleLogger";
pub const FILE_LOGGER: &str = "citadel.demo.FileLogger";
pub const GREETER: &str = "citadel.demo.DefaultGreeter";

/// Role configuration for the demo components.
pub const ROLES_JSON: &str = include_str!("../config/roles.json");

/// Container configuration assembling one of each demo component.
pub const CONTAINER_JSON: &str = include_str!("../config/container.json");

/// Register the demo roles and implementations.
pub fn register_types(catalog: &TypeCatalog) -> Result<(), DemoError> {
    catalog
        .register_role(&Role::new(LOGGER_ROLE))?
        .register_role(&Role::new(GREETER_ROLE))?
        .register::<ConsoleLogger>()?
        .register::<FileLogger>()?
        .register::<Greeter>()?;
    Ok(())
}

/// Role manager built from [`ROLES_JSON`].
pub fn role_manager() -> Result<RoleManager, DemoError> {
    let configuration: Configuration = serde_json::from_str(ROLES_JSON)?;
    Ok(RoleManager::from_configuration(&configuration)?)
}

/// Container configuration parsed from [`CONTAINER_JSON`].
pub fn container_configuration() -> Result<Configuration, DemoError> {
    Ok(serde_json::from_str(CONTAINER_JSON)?)
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("embedded demo configuration is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Roles(#[from] RoleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Line-oriented output shared by both loggers.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str) -> Result<(), LifecycleError>;

    fn lines_written(&self) -> u64;
}

/// View any demo logger instance as a [`LogSink`].
pub fn as_sink(instance: &ComponentInstance) -> Option<Arc<dyn LogSink>> {
    if let Some(console) = downcast_instance::<ConsoleLogger>(instance) {
        return Some(console as Arc<dyn LogSink>);
    }
    downcast_instance::<FileLogger>(instance).map(|file| file as Arc<dyn LogSink>)
}

fn closed(stage: LifecycleStage, what: &str) -> LifecycleError {
    LifecycleError::failed(stage, format!("{what} is closed"))
}

// =============================================================================
// CONSOLE LOGGER
// =============================================================================

/// Writes prefixed lines to stdout.
#[derive(Debug)]
pub struct ConsoleLogger {
    prefix: String,
    logger: Option<ComponentLogger>,
    open: AtomicBool,
    written: AtomicU64,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            prefix: "[citadel]".to_string(),
            logger: None,
            open: AtomicBool::new(false),
            written: AtomicU64::new(0),
        }
    }
}

impl ConsoleLogger {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl Component for ConsoleLogger {
    fn enable_logging(&mut self, logger: ComponentLogger) {
        self.logger = Some(logger);
    }

    /// `prefix` attribute, or a `<prefix>` child's value.
    fn configure(&mut self, configuration: &Configuration) -> Result<(), LifecycleError> {
        if let Some(prefix) = configuration.attributes.get("prefix") {
            self.prefix = prefix.clone();
        } else if let Some(child) = configuration.child("prefix") {
            self.prefix = child.value()?.to_string();
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), LifecycleError> {
        self.open.store(true, Ordering::Release);
        if let Some(logger) = &self.logger {
            logger.debug("console logger ready");
        }
        Ok(())
    }

    fn dispose(&self) -> Result<(), LifecycleError> {
        self.open.store(false, Ordering::Release);
        Ok(())
    }
}

impl ComponentType for ConsoleLogger {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class(CONSOLE_LOGGER)
            .implements(LOGGER_ROLE)
            .with_capabilities([
                Capability::LogEnabled,
                Capability::Configurable,
                Capability::Initializable,
                Capability::Disposable,
            ])
    }
}

impl LogSink for ConsoleLogger {
    fn write_line(&self, line: &str) -> Result<(), LifecycleError> {
        if !self.is_open() {
            return Err(closed(LifecycleStage::Start, "console logger"));
        }
        println!("{} {}", self.prefix, line);
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn lines_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}

// =============================================================================
// FILE LOGGER
// =============================================================================

/// Appends lines to a file opened during initialization.
#[derive(Debug)]
pub struct FileLogger {
    path: PathBuf,
    file: Mutex<Option<File>>,
    written: AtomicU64,
}

impl Default for FileLogger {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("citadel-demo.log"),
            file: Mutex::new(None),
            written: AtomicU64::new(0),
        }
    }
}

impl FileLogger {
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Component for FileLogger {
    fn configure(&mut self, configuration: &Configuration) -> Result<(), LifecycleError> {
        if let Some(path) = configuration.attributes.get("path") {
            self.path = PathBuf::from(path);
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), LifecycleError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LifecycleError::failed(
                    LifecycleStage::Initialize,
                    format!("cannot open {}: {e}", self.path.display()),
                )
            })?;
        *self.file.get_mut() = Some(file);
        Ok(())
    }

    fn dispose(&self) -> Result<(), LifecycleError> {
        if let Some(mut file) = self.file.lock().take() {
            file.flush()
                .map_err(|e| LifecycleError::failed(LifecycleStage::Dispose, e.to_string()))?;
        }
        Ok(())
    }
}

impl ComponentType for FileLogger {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class(FILE_LOGGER)
            .implements(LOGGER_ROLE)
            .with_capabilities([
                Capability::Configurable,
                Capability::Initializable,
                Capability::Disposable,
            ])
    }
}

impl LogSink for FileLogger {
    fn write_line(&self, line: &str) -> Result<(), LifecycleError> {
        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| closed(LifecycleStage::Start, "file logger"))?;
        writeln!(file, "{line}")
            .map_err(|e| LifecycleError::failed(LifecycleStage::Start, e.to_string()))?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn lines_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}

// =============================================================================
// GREETER
// =============================================================================

/// Greets through a logger pulled from the container.
///
/// Parameters: `greeting` (default `Hello`), `logger` (hint of the logger to
/// use, default: the role's default logger).
pub struct Greeter {
    greeting: String,
    logger_hint: Option<String>,
    locator: Option<Arc<dyn ServiceLocator>>,
    sink: Option<Arc<dyn LogSink>>,
    running: AtomicBool,
}

impl Default for Greeter {
    fn default() -> Self {
        Self {
            greeting: "Hello".to_string(),
            logger_hint: None,
            locator: None,
            sink: None,
            running: AtomicBool::new(false),
        }
    }
}

impl Greeter {
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn logger_hint(&self) -> Option<&str> {
        self.logger_hint.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Write a greeting to the logger and return it.
    pub fn greet(&self, name: &str) -> Result<String, LifecycleError> {
        if !self.is_running() {
            return Err(closed(LifecycleStage::Start, "greeter"));
        }
        let message = format!("{}, {}!", self.greeting, name);
        if let Some(sink) = &self.sink {
            sink.write_line(&message)?;
        }
        Ok(message)
    }
}

impl Component for Greeter {
    fn service(&mut self, locator: Arc<dyn ServiceLocator>) -> Result<(), LifecycleError> {
        self.locator = Some(locator);
        Ok(())
    }

    fn parameterize(&mut self, parameters: &Parameters) -> Result<(), LifecycleError> {
        self.greeting = parameters.get_or("greeting", "Hello").to_string();
        self.logger_hint = parameters.get("logger").map(str::to_string);
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), LifecycleError> {
        let locator = self.locator.as_ref().ok_or_else(|| {
            LifecycleError::failed(LifecycleStage::Initialize, "no service locator")
        })?;
        let instance = locator.lookup(&Role::new(LOGGER_ROLE), self.logger_hint.as_deref())?;
        let sink = as_sink(&instance).ok_or_else(|| {
            LifecycleError::failed(LifecycleStage::Initialize, "logger is not a demo logger")
        })?;
        self.sink = Some(sink);
        Ok(())
    }

    fn start(&mut self) -> Result<(), LifecycleError> {
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) -> Result<(), LifecycleError> {
        self.running.store(false, Ordering::Release);
        Ok(())
    }

    fn dispose(&self) -> Result<(), LifecycleError> {
        Ok(())
    }
}

impl ComponentType for Greeter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::class(GREETER)
            .implements(GREETER_ROLE)
            .with_capabilities([
                Capability::DependencyPull,
                Capability::Parameterizable,
                Capability::Initializable,
                Capability::Startable,
                Capability::Disposable,
            ])
    }
}

impl std::fmt::Debug for Greeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Greeter")
            .field("greeting", &self.greeting)
            .field("logger_hint", &self.logger_hint)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
