//! # Configuration Tree
//!
//! A read-only hierarchical configuration: named elements with attributes,
//! an optional text value and ordered children. The container never parses
//! documents; callers build the tree directly or deserialize it with serde.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// One element of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Element name.
    pub name: String,
    /// Where the element came from, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Configuration>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Configuration) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// All children, in document order.
    #[must_use]
    pub fn children(&self) -> &[Configuration] {
        &self.children
    }

    /// Children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Configuration> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First child with the given element name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Configuration> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Names of all attributes, sorted.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Required attribute.
    pub fn attribute(&self, name: &str) -> Result<&str, ConfigurationError> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigurationError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.to_string(),
                location: self.location.clone().unwrap_or_else(|| "-".to_string()),
            })
    }

    /// Optional attribute with a fallback.
    #[must_use]
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attributes.get(name).map_or(default, String::as_str)
    }

    /// Boolean attribute. Missing yields `default`; unparseable text is an error.
    pub fn attribute_as_bool(&self, name: &str, default: bool) -> Result<bool, ConfigurationError> {
        match self.attributes.get(name) {
            None => Ok(default),
            Some(raw) => parse_bool(raw).ok_or_else(|| ConfigurationError::InvalidValue {
                element: self.name.clone(),
                attribute: name.to_string(),
                value: raw.clone(),
                expected: "true or false",
            }),
        }
    }

    /// Attribute parsed through `FromStr`.
    pub fn attribute_as<T: FromStr>(&self, name: &str) -> Result<Option<T>, ConfigurationError> {
        match self.attributes.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigurationError::InvalidValue {
                    element: self.name.clone(),
                    attribute: name.to_string(),
                    value: raw.clone(),
                    expected: std::any::type_name::<T>(),
                }),
        }
    }

    /// Required text value.
    pub fn value(&self) -> Result<&str, ConfigurationError> {
        self.value
            .as_deref()
            .ok_or_else(|| ConfigurationError::MissingValue {
                element: self.name.clone(),
            })
    }

    #[must_use]
    pub fn value_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.value.as_deref().unwrap_or(default)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Configuration {
        Configuration::new("container")
            .with_location("demo.json:1")
            .with_child(
                Configuration::new("component")
                    .with_attribute("id", "console")
                    .with_attribute("default", "true")
                    .with_child(Configuration::new("prefix").with_value("[demo]")),
            )
            .with_child(Configuration::new("component").with_attribute("id", "file"))
            .with_child(Configuration::new("greeter"))
    }

    #[test]
    fn test_child_lookup() {
        let config = sample();
        assert_eq!(config.children().len(), 3);
        assert_eq!(config.children_named("component").count(), 2);
        assert!(config.child("greeter").is_some());
        assert!(config.child("missing").is_none());
    }

    #[test]
    fn test_attribute_access() {
        let config = sample();
        let console = &config.children()[0];
        assert_eq!(console.attribute("id").unwrap(), "console");
        assert_eq!(console.attribute_or("absent", "fallback"), "fallback");
        assert!(console.attribute_as_bool("default", false).unwrap());
        assert!(!config.children()[1].attribute_as_bool("default", false).unwrap());

        let err = config.attribute("id").unwrap_err();
        assert!(err.to_string().contains("demo.json:1"));
    }

    #[test]
    fn test_invalid_bool_is_error() {
        let config = Configuration::new("c").with_attribute("default", "perhaps");
        assert!(config.attribute_as_bool("default", false).is_err());
    }

    #[test]
    fn test_attribute_as_parses() {
        let config = Configuration::new("pool").with_attribute("size", "8");
        assert_eq!(config.attribute_as::<usize>("size").unwrap(), Some(8));
        assert_eq!(config.attribute_as::<usize>("max").unwrap(), None);
        let bad = Configuration::new("pool").with_attribute("size", "eight");
        assert!(bad.attribute_as::<usize>("size").is_err());
    }

    #[test]
    fn test_value_access() {
        let config = sample();
        let prefix = config.children()[0].child("prefix").unwrap();
        assert_eq!(prefix.value().unwrap(), "[demo]");
        assert!(config.value().is_err());
        assert_eq!(config.value_or("none"), "none");
    }

    #[test]
    fn test_deserialize_from_json() {
        let raw = r#"{
            "name": "container",
            "children": [
                { "name": "component", "attributes": { "id": "a", "class": "demo.A" } }
            ]
        }"#;
        let config: Configuration = serde_json::from_str(raw).unwrap();
        assert_eq!(config.children()[0].attribute("class").unwrap(), "demo.A");
        assert!(config.location().is_none());
    }
}
