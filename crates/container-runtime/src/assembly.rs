//! Configuration-driven assembly.
//!
//! Each child element of a container configuration becomes one registered
//! component:
//!
//! ```text
//! <container>
//!   <component id="console" class="citadel.demo.ConsoleLogger"/>
//!   <file-logger id="file" activation="lazy" path="/tmp/demo.log"/>
//! </container>
//! ```
//!
//! `component` elements name their implementation with `class`; any other
//! element name is a role shorthand, optionally overridden by `class`.

use std::path::{Path, PathBuf};

use shared_types::{Activation, ComponentMetadata, Configuration, TypeKey};
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::container::Container;
use crate::error::ContainerError;

/// Element one component is assembled from.
pub const COMPONENT_ELEMENT: &str = "component";

/// One element that could not be registered.
#[derive(Debug)]
pub struct AssemblyFailure {
    pub element: String,
    pub hint: String,
    pub error: ContainerError,
}

/// Outcome of one [`assemble`] pass.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    /// Hints registered, in document order.
    pub registered: Vec<String>,
    pub failures: Vec<AssemblyFailure>,
}

impl AssemblyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Register every child of `configuration` with `container`.
///
/// A failing element is recorded in the report; the remaining elements are
/// still assembled.
pub fn assemble(container: &Container, configuration: &Configuration) -> AssemblyReport {
    let mut report = AssemblyReport::default();

    for (index, element) in configuration.children().iter().enumerate() {
        let hint = hint_for(element, index);
        let outcome = metadata_for(container, element, &hint)
            .and_then(|metadata| container.add_component(metadata));

        match outcome {
            Ok(()) => {
                debug!(element = element.name(), hint = %hint, "[Assembly] registered");
                report.registered.push(hint);
            }
            Err(error) => {
                warn!(
                    element = element.name(),
                    hint = %hint,
                    error = %error,
                    "[Assembly] element skipped"
                );
                report.failures.push(AssemblyFailure {
                    element: element.name().to_string(),
                    hint,
                    error,
                });
            }
        }
    }

    info!(
        registered = report.registered.len(),
        failed = report.failures.len(),
        "[Assembly] configuration assembled"
    );
    report
}

/// `id` attribute, else the element's location, else `<name>-<index>`.
fn hint_for(element: &Configuration, index: usize) -> String {
    element
        .attributes
        .get("id")
        .cloned()
        .or_else(|| element.location().map(str::to_string))
        .unwrap_or_else(|| format!("{}-{}", element.name(), index))
}

fn metadata_for(
    container: &Container,
    element: &Configuration,
    hint: &str,
) -> Result<ComponentMetadata, ContainerError> {
    let implementation = if element.name() == COMPONENT_ELEMENT {
        TypeKey::new(element.attribute("class")?)
    } else {
        match element.attributes.get("class") {
            Some(class) => TypeKey::new(class.as_str()),
            None => container
                .roles()
                .for_shorthand(element.name())
                .map(|entry| entry.implementation().clone())
                .ok_or_else(|| ContainerError::UnknownShorthand {
                    element: element.name().to_string(),
                })?,
        }
    };

    let activation = element
        .attribute_as::<Activation>("activation")?
        .unwrap_or(container.config().default_activation);

    Ok(ComponentMetadata::new(
        hint,
        implementation,
        element.clone(),
        activation,
    ))
}

/// Read a JSON-encoded configuration tree.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: PathBuf::from(path),
        source,
    })
}
