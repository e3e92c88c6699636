//! Merge-by-id of application template collections.

use super::LoadableRef;
use crate::error::ExtensionError;

use log::{debug, warn};
use serde_json::{Map, Value};

/// Where a template's body comes from.
#[derive(Debug, Clone)]
pub enum TemplateResource {
    /// Body given directly in configuration.
    Inline(Value),
    /// Body to be fetched on first use.
    Pending(LoadableRef),
}

/// One merged template, category or group entry.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub id: String,
    /// Every field except `id` and `resource`, after merging.
    pub fields: Map<String, Value>,
    pub resource: Option<TemplateResource>,
}

/// The merged template collections the console renders.
#[derive(Debug, Clone, Default)]
pub struct ApplicationTemplates {
    pub categories: Vec<TemplateEntry>,
    pub groups: Vec<TemplateEntry>,
    pub templates: Vec<TemplateEntry>,
}

impl ApplicationTemplates {
    pub fn template(&self, id: &str) -> Option<&TemplateEntry> {
        self.templates.iter().find(|t| t.id == id)
    }
}

/// Recursively merge `patch` into `target`.
///
/// Objects merge key by key; arrays and scalars in `patch` replace whatever
/// `target` held.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// Merge `overrides` into `base` by `id`.
///
/// Matching entries are deep merged in place. Overrides with unknown ids are
/// appended in their own order. Base entries without an id are dropped.
pub fn merge_by_id(
    collection: &str,
    base: &[Value],
    overrides: &[Value],
) -> Result<Vec<Value>, ExtensionError> {
    let mut merged: Vec<Value> = base
        .iter()
        .filter(|entry| {
            let has_id = entry_id(entry).is_some();
            if !has_id {
                warn!("Dropping {collection} entry without an id");
            }
            has_id
        })
        .cloned()
        .collect();

    for patch in overrides {
        let id = entry_id(patch).ok_or_else(|| ExtensionError::MissingTemplateId {
            collection: collection.to_string(),
        })?;
        match merged.iter_mut().find(|entry| entry_id(entry) == Some(id)) {
            Some(existing) => {
                debug!("Overriding {collection} entry '{id}'");
                deep_merge(existing, patch);
            }
            None => {
                debug!("Adding {collection} entry '{id}'");
                merged.push(patch.clone());
            }
        }
    }

    Ok(merged)
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}
