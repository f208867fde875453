//! # Test Fixtures
//!
//! A configurable widget component and containers built around it.
//!
//! Widget behavior comes from its configuration element:
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `fail-initialize` | `initialize()` fails |
//! | `fail-dispose` | `dispose()` fails |
//! | `delay-ms` | `initialize()` sleeps first |

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use container_runtime::{Container, ContainerConfig};
use ct_03_lifecycle::{RoleEntry, RoleManager, TypeCatalog};
use shared_types::{
    Activation, Capability, Component, ComponentInfo, ComponentMetadata, Configuration,
    LifecycleError, LifecycleStage, Role, TypeDescriptor,
};

pub const WIDGET_ROLE: &str = "citadel.test.Widget";
pub const WIDGET: &str = "citadel.test.WidgetImpl";

/// Counters shared by every widget of one container.
#[derive(Debug, Default)]
pub struct WidgetCounters {
    pub constructions: AtomicUsize,
    pub initializations: AtomicUsize,
    pub disposals: AtomicUsize,
}

impl WidgetCounters {
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }

    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }
}

pub struct Widget {
    counters: Arc<WidgetCounters>,
    fail_initialize: bool,
    fail_dispose: bool,
    delay: Duration,
}

impl Widget {
    pub fn new(counters: Arc<WidgetCounters>) -> Self {
        Self {
            counters,
            fail_initialize: false,
            fail_dispose: false,
            delay: Duration::ZERO,
        }
    }
}

impl Component for Widget {
    fn configure(&mut self, configuration: &Configuration) -> Result<(), LifecycleError> {
        self.fail_initialize = configuration.attribute_as_bool("fail-initialize", false)?;
        self.fail_dispose = configuration.attribute_as_bool("fail-dispose", false)?;
        self.delay = configuration
            .attribute_as::<u64>("delay-ms")?
            .map(Duration::from_millis)
            .unwrap_or_default();
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), LifecycleError> {
        std::thread::sleep(self.delay);
        self.counters.initializations.fetch_add(1, Ordering::SeqCst);
        if self.fail_initialize {
            return Err(LifecycleError::failed(LifecycleStage::Initialize, "widget told to fail"));
        }
        Ok(())
    }

    fn dispose(&self) -> Result<(), LifecycleError> {
        self.counters.disposals.fetch_add(1, Ordering::SeqCst);
        if self.fail_dispose {
            return Err(LifecycleError::failed(LifecycleStage::Dispose, "widget told to fail"));
        }
        Ok(())
    }
}

pub fn widget_descriptor() -> TypeDescriptor {
    TypeDescriptor::class(WIDGET)
        .implements(WIDGET_ROLE)
        .with_capabilities([
            Capability::Configurable,
            Capability::Initializable,
            Capability::Disposable,
        ])
}

/// Catalog holding the widget role and implementation.
pub fn widget_catalog(counters: &Arc<WidgetCounters>) -> Arc<TypeCatalog> {
    let catalog = Arc::new(TypeCatalog::new());
    let counters = Arc::clone(counters);
    catalog
        .register_role(&Role::new(WIDGET_ROLE))
        .and_then(|catalog| {
            catalog.register_component(widget_descriptor(), move || {
                counters.constructions.fetch_add(1, Ordering::SeqCst);
                Box::new(Widget::new(Arc::clone(&counters))) as Box<dyn Component>
            })
        })
        .expect("empty catalog accepts the widget types");
    catalog
}

pub fn widget_roles() -> RoleManager {
    let mut roles = RoleManager::new();
    let entry = RoleEntry::new(WIDGET_ROLE, WIDGET, "widget").with_info(
        ComponentInfo::new()
            .service(WIDGET_ROLE)
            .configuration_schema("citadel.test.widget"),
    );
    roles.register(entry).expect("empty role manager accepts the widget");
    roles
}

/// Container over the widget catalog, plus the widgets' shared counters.
pub fn widget_container(config: ContainerConfig) -> (Container, Arc<WidgetCounters>) {
    let counters = Arc::new(WidgetCounters::default());
    let container = Container::builder(config)
        .catalog(widget_catalog(&counters))
        .roles(Arc::new(widget_roles()))
        .build()
        .expect("widget container builds");
    (container, counters)
}

/// Builder for widget metadata.
#[derive(Debug, Clone)]
pub struct WidgetSpec {
    hint: String,
    activation: Activation,
    configuration: Configuration,
}

impl WidgetSpec {
    pub fn new(hint: impl Into<String>) -> Self {
        Self {
            hint: hint.into(),
            activation: Activation::Eager,
            configuration: Configuration::new("widget"),
        }
    }

    pub fn lazy(mut self) -> Self {
        self.activation = Activation::Lazy;
        self
    }

    pub fn default_hint(mut self) -> Self {
        self.configuration = self.configuration.with_attribute("default", "true");
        self
    }

    pub fn failing_initialize(mut self) -> Self {
        self.configuration = self.configuration.with_attribute("fail-initialize", "true");
        self
    }

    pub fn failing_dispose(mut self) -> Self {
        self.configuration = self.configuration.with_attribute("fail-dispose", "true");
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.configuration = self
            .configuration
            .with_attribute("delay-ms", delay.as_millis().to_string());
        self
    }

    pub fn metadata(self) -> ComponentMetadata {
        ComponentMetadata::new(self.hint, WIDGET, self.configuration, self.activation)
    }
}

pub fn widget_role() -> Role {
    Role::new(WIDGET_ROLE)
}
