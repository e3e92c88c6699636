//! Declarative extension configuration.

use crate::error::{ConsoleResult, ExtensionError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Kind of UI fragment an extension supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionType {
    Tab,
    Component,
    Route,
}

impl ExtensionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::Component => "component",
            Self::Route => "route",
        }
    }
}

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enabled_by_default() -> bool {
    true
}

/// One lazily loadable UI fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDescriptor {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_component: Option<String>,
    #[serde(rename = "type")]
    pub extension_type: ExtensionType,
    /// Path handed to the module loader
    pub resource_path: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl ExtensionDescriptor {
    pub fn new(
        component: impl Into<String>,
        extension_type: ExtensionType,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            sub_component: None,
            extension_type,
            resource_path: resource_path.into(),
            enabled: true,
            meta: Map::new(),
        }
    }

    pub fn with_sub_component(mut self, sub_component: impl Into<String>) -> Self {
        self.sub_component = Some(sub_component.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Template categories, groups and templates, each an object with an `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateCollections {
    pub categories: Vec<Value>,
    pub groups: Vec<Value>,
    pub templates: Vec<Value>,
}

impl TemplateCollections {
    pub(crate) fn named(&self) -> [(&'static str, &[Value]); 3] {
        [
            ("categories", &self.categories),
            ("groups", &self.groups),
            ("templates", &self.templates),
        ]
    }

    /// Check every entry carries a string `id`.
    pub fn validate(&self) -> Result<(), ExtensionError> {
        for (collection, entries) in self.named() {
            if entries
                .iter()
                .any(|entry| entry.get("id").and_then(Value::as_str).is_none())
            {
                return Err(ExtensionError::MissingTemplateId {
                    collection: collection.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The full extension configuration registered at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionsConfig {
    /// Section name → fragments contributed to that section
    pub sections: HashMap<String, Vec<ExtensionDescriptor>>,
    /// Overrides merged into the built-in application templates
    pub template_extensions: TemplateCollections,
    /// Extra routes
    pub routes: Vec<ExtensionDescriptor>,
}

impl ExtensionsConfig {
    pub fn from_json_str(content: &str) -> ConsoleResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConsoleResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Add a descriptor to a section.
    pub fn with_section(mut self, section: impl Into<String>, descriptor: ExtensionDescriptor) -> Self {
        self.sections.entry(section.into()).or_default().push(descriptor);
        self
    }

    pub fn with_route(mut self, descriptor: ExtensionDescriptor) -> Self {
        self.routes.push(descriptor);
        self
    }

    pub fn with_template_extensions(mut self, templates: TemplateCollections) -> Self {
        self.template_extensions = templates;
        self
    }

    /// Count of enabled descriptors across sections and routes.
    pub fn enabled_count(&self) -> usize {
        self.sections
            .values()
            .flatten()
            .chain(self.routes.iter())
            .filter(|d| d.enabled)
            .count()
    }
}
