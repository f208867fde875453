//! Catalog-backed object factory.
//!
//! Constructs components from the [`TypeCatalog`] and runs the lifecycle
//! stages their descriptor opts into, in this order:
//!
//! ```text
//! LogEnabled → Contextualizable → DependencyPull → DependencyInjection
//!            → Configurable → Parameterizable → Initializable → Startable
//! ```
//!
//! Teardown runs `stop` (Startable) and then `dispose` (Disposable); both
//! run even if the first fails.

use std::sync::Arc;

use shared_types::{
    Capability, ComponentInstance, ComponentLogger, Configuration, LifecycleError,
    LifecycleStage, Parameters, TypeDescriptor,
};

use super::catalog::TypeCatalog;
use crate::error::FactoryError;
use crate::ports::{CreationContext, ObjectFactory};

pub struct DefaultObjectFactory {
    catalog: Arc<TypeCatalog>,
}

impl DefaultObjectFactory {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }
}

fn stage_error(
    descriptor: &TypeDescriptor,
    stage: LifecycleStage,
) -> impl FnOnce(LifecycleError) -> FactoryError + '_ {
    move |source| FactoryError::Lifecycle {
        implementation: descriptor.key().clone(),
        stage,
        source,
    }
}

impl ObjectFactory for DefaultObjectFactory {
    fn can_create(&self, descriptor: &TypeDescriptor) -> bool {
        self.catalog.has_constructor(descriptor.key())
    }

    fn new_instance(
        &self,
        descriptor: &TypeDescriptor,
        configuration: &Configuration,
        creation: &CreationContext,
    ) -> Result<ComponentInstance, FactoryError> {
        let mut component = self.catalog.construct(descriptor.key())?;
        let wants = |capability| descriptor.has_capability(capability);

        if wants(Capability::LogEnabled) {
            component.enable_logging(ComponentLogger::new(
                creation.role.as_str(),
                creation.hint.as_str(),
            ));
        }
        if wants(Capability::Contextualizable) {
            component
                .contextualize(&creation.context)
                .map_err(stage_error(descriptor, LifecycleStage::Contextualize))?;
        }
        if wants(Capability::DependencyPull) {
            component
                .service(Arc::clone(&creation.locator))
                .map_err(stage_error(descriptor, LifecycleStage::Service))?;
        }
        if wants(Capability::DependencyInjection) {
            component
                .inject(creation.locator.as_ref())
                .map_err(stage_error(descriptor, LifecycleStage::Inject))?;
        }
        if wants(Capability::Configurable) {
            component
                .configure(configuration)
                .map_err(stage_error(descriptor, LifecycleStage::Configure))?;
        }
        if wants(Capability::Parameterizable) {
            let parameters = Parameters::from_configuration(configuration)
                .map_err(|e| stage_error(descriptor, LifecycleStage::Parameterize)(e.into()))?;
            component
                .parameterize(&parameters)
                .map_err(stage_error(descriptor, LifecycleStage::Parameterize))?;
        }
        if wants(Capability::Initializable) {
            component
                .initialize()
                .map_err(stage_error(descriptor, LifecycleStage::Initialize))?;
        }
        if wants(Capability::Startable) {
            component
                .start()
                .map_err(stage_error(descriptor, LifecycleStage::Start))?;
        }

        Ok(Arc::from(component))
    }

    fn dispose(
        &self,
        descriptor: &TypeDescriptor,
        instance: &ComponentInstance,
    ) -> Result<(), FactoryError> {
        let mut first = None;
        if descriptor.has_capability(Capability::Startable) {
            if let Err(e) = instance.stop() {
                first.get_or_insert(stage_error(descriptor, LifecycleStage::Stop)(e));
            }
        }
        if descriptor.has_capability(Capability::Disposable) {
            if let Err(e) = instance.dispose() {
                first.get_or_insert(stage_error(descriptor, LifecycleStage::Dispose)(e));
            }
        }
        first.map_or(Ok(()), Err)
    }
}
