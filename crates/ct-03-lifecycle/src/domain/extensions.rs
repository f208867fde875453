//! Lifecycle extensions.
//!
//! Hooks run by every handler around the component's own lifecycle:
//! after creation, before destruction and on each access.

use std::sync::Arc;

use shared_types::{ComponentInstance, Context, LifecycleError};

/// One extension. All hooks default to no-ops.
pub trait LifecycleExtension: Send + Sync {
    fn name(&self) -> &str;

    fn create(&self, _instance: &ComponentInstance, _context: &Context) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn destroy(&self, _instance: &ComponentInstance, _context: &Context) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn access(&self, _instance: &ComponentInstance, _context: &Context) -> Result<(), LifecycleError> {
        Ok(())
    }
}

/// Ordered set of extensions shared by all handlers of a container.
#[derive(Clone, Default)]
pub struct LifecycleExtensions {
    extensions: Vec<Arc<dyn LifecycleExtension>>,
}

impl LifecycleExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, extension: Arc<dyn LifecycleExtension>) {
        self.extensions.push(extension);
    }

    #[must_use]
    pub fn with(mut self, extension: Arc<dyn LifecycleExtension>) -> Self {
        self.add(extension);
        self
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Creation hooks in registration order; stops at the first failure.
    pub fn run_create(
        &self,
        instance: &ComponentInstance,
        context: &Context,
    ) -> Result<(), (String, LifecycleError)> {
        for extension in &self.extensions {
            extension
                .create(instance, context)
                .map_err(|e| (extension.name().to_string(), e))?;
        }
        Ok(())
    }

    /// Access hooks in registration order; stops at the first failure.
    pub fn run_access(
        &self,
        instance: &ComponentInstance,
        context: &Context,
    ) -> Result<(), (String, LifecycleError)> {
        for extension in &self.extensions {
            extension
                .access(instance, context)
                .map_err(|e| (extension.name().to_string(), e))?;
        }
        Ok(())
    }

    /// Destruction hooks in reverse order. Every hook runs; the first
    /// failure is returned.
    pub fn run_destroy(
        &self,
        instance: &ComponentInstance,
        context: &Context,
    ) -> Result<(), (String, LifecycleError)> {
        let mut first = None;
        for extension in self.extensions.iter().rev() {
            if let Err(e) = extension.destroy(instance, context) {
                first.get_or_insert((extension.name().to_string(), e));
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for LifecycleExtensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.extensions.iter().map(|e| e.name()).collect();
        f.debug_struct("LifecycleExtensions")
            .field("extensions", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use shared_types::{Component, LifecycleStage};

    struct Nop;
    impl Component for Nop {}

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_destroy: bool,
    }

    impl LifecycleExtension for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn create(&self, _: &ComponentInstance, _: &Context) -> Result<(), LifecycleError> {
            self.log.lock().push(format!("create:{}", self.name));
            Ok(())
        }

        fn destroy(&self, _: &ComponentInstance, _: &Context) -> Result<(), LifecycleError> {
            self.log.lock().push(format!("destroy:{}", self.name));
            if self.fail_destroy {
                return Err(LifecycleError::failed(LifecycleStage::Dispose, "boom"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_destroy_runs_in_reverse_and_reports_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let extensions = LifecycleExtensions::new()
            .with(Arc::new(Recorder {
                name: "a",
                log: Arc::clone(&log),
                fail_destroy: true,
            }))
            .with(Arc::new(Recorder {
                name: "b",
                log: Arc::clone(&log),
                fail_destroy: false,
            }));
        let instance: ComponentInstance = Arc::new(Nop);
        let context = Context::new();

        extensions.run_create(&instance, &context).unwrap();
        let (name, _) = extensions.run_destroy(&instance, &context).unwrap_err();

        assert_eq!(name, "a");
        assert_eq!(
            *log.lock(),
            vec!["create:a", "create:b", "destroy:b", "destroy:a"]
        );
    }
}
