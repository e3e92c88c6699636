//! The extension registry.
//!
//! Holds the single registered [`ExtensionsConfig`] and hands out
//! [`LoadableRef`]s. Each distinct extension key maps to exactly one
//! [`LazyResource`], so however many times a component is resolved its
//! loader runs at most once.

use super::config::{ExtensionDescriptor, ExtensionType, ExtensionsConfig, TemplateCollections};
use super::loader::{LazyResource, Loader, ModuleLoader, ResolutionFailure, ResolutionState};
use super::templates::{ApplicationTemplates, TemplateEntry, TemplateResource, merge_by_id};
use crate::error::ExtensionError;

use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

const TEMPLATE_KIND: &str = "template";

/// Where a fragment was declared.
///
/// Routes and templates live in their own scopes, so no configured section
/// name can collide with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionScope {
    Section(String),
    Routes,
    Template { collection: String },
}

impl fmt::Display for ExtensionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(section) => f.write_str(section),
            Self::Routes => f.write_str("@routes"),
            Self::Template { collection } => write!(f, "@templates:{collection}"),
        }
    }
}

/// Identity of one lazily loaded fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionKey {
    pub scope: ExtensionScope,
    pub kind: String,
    pub component: String,
    pub sub_component: Option<String>,
}

impl ExtensionKey {
    fn for_descriptor(scope: ExtensionScope, descriptor: &ExtensionDescriptor) -> Self {
        Self {
            scope,
            kind: descriptor.extension_type.as_str().to_string(),
            component: descriptor.component.clone(),
            sub_component: descriptor.sub_component.clone(),
        }
    }

    fn for_section(section: &str, descriptor: &ExtensionDescriptor) -> Self {
        Self::for_descriptor(ExtensionScope::Section(section.to_string()), descriptor)
    }

    /// Template resources are keyed by their path as well as their id, so
    /// a template whose path changes gets a fresh resource.
    fn for_template(collection: &str, id: &str, resource_path: &str) -> Self {
        Self {
            scope: ExtensionScope::Template {
                collection: collection.to_string(),
            },
            kind: TEMPLATE_KIND.to_string(),
            component: id.to_string(),
            sub_component: Some(resource_path.to_string()),
        }
    }
}

impl fmt::Display for ExtensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.scope, self.kind, self.component)?;
        if let Some(sub) = &self.sub_component {
            write!(f, "/{sub}")?;
        }
        Ok(())
    }
}

/// Outcome of loading a [`LoadableRef`].
#[derive(Debug, Clone)]
pub enum Resolution {
    Ready(Arc<Value>),
    /// The fragment could not be produced; render the fallback UI.
    Fallback(ResolutionFailure),
}

impl Resolution {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Fallback(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Arc<Value>, ResolutionFailure> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Fallback(failure) => Err(failure),
        }
    }
}

/// A handle to a deferred fragment. Cheap to clone; clones share the cache.
#[derive(Debug, Clone)]
pub struct LoadableRef {
    key: ExtensionKey,
    resource_path: String,
    meta: Map<String, Value>,
    resource: Arc<LazyResource<Value>>,
}

impl LoadableRef {
    pub fn key(&self) -> &ExtensionKey {
        &self.key
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn state(&self) -> ResolutionState {
        self.resource.state()
    }

    /// Perform the deferred load, or return the cached outcome.
    pub async fn load(&self) -> Resolution {
        match self.resource.resolve().await {
            Ok(value) => Resolution::Ready(value),
            Err(failure) => Resolution::Fallback(failure),
        }
    }
}

/// Registry of UI extensions, configured once at startup.
pub struct ExtensionRegistry {
    loader: Arc<dyn ModuleLoader>,
    config: OnceLock<ExtensionsConfig>,
    cache: Mutex<HashMap<ExtensionKey, Arc<LazyResource<Value>>>>,
}

impl ExtensionRegistry {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            config: OnceLock::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_loader<L: ModuleLoader + 'static>(loader: L) -> Self {
        Self::new(Arc::new(loader))
    }

    /// Register the extension configuration. Only the first call succeeds.
    pub fn register(&self, config: ExtensionsConfig) -> Result<(), ExtensionError> {
        config.template_extensions.validate()?;
        let sections = config.sections.len();
        let enabled = config.enabled_count();
        self.config
            .set(config)
            .map_err(|_| ExtensionError::AlreadyRegistered)?;
        info!(
            "Registered extensions: {} sections, {} enabled fragments",
            sections, enabled
        );
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.config.get().is_some()
    }

    /// The enabled top-level fragment of `extension_type` in `section`.
    pub fn resolve_component(
        &self,
        section: &str,
        extension_type: ExtensionType,
    ) -> Option<LoadableRef> {
        let descriptor = self.find(section, |d| {
            d.extension_type == extension_type && d.sub_component.is_none()
        })?;
        Some(self.loadable(ExtensionKey::for_section(section, descriptor), descriptor))
    }

    /// The enabled fragment for a named component, optionally narrowed to
    /// one of its sub-components.
    pub fn resolve_sub_component(
        &self,
        section: &str,
        extension_type: ExtensionType,
        component: &str,
        sub_component: Option<&str>,
    ) -> Option<LoadableRef> {
        let descriptor = self.find(section, |d| {
            d.extension_type == extension_type
                && d.component == component
                && d.sub_component.as_deref() == sub_component
        })?;
        Some(self.loadable(ExtensionKey::for_section(section, descriptor), descriptor))
    }

    /// Every enabled extension route, in configuration order.
    pub fn resolve_routes(&self) -> Vec<LoadableRef> {
        let Some(config) = self.config.get() else {
            return Vec::new();
        };
        config
            .routes
            .iter()
            .filter(|d| d.enabled)
            .map(|d| self.loadable(ExtensionKey::for_descriptor(ExtensionScope::Routes, d), d))
            .collect()
    }

    /// Resolution state of the fragment `resolve_component` would return.
    ///
    /// `None` when no enabled fragment matches.
    pub fn state(&self, section: &str, extension_type: ExtensionType) -> Option<ResolutionState> {
        let descriptor = self.find(section, |d| {
            d.extension_type == extension_type && d.sub_component.is_none()
        })?;
        let key = ExtensionKey::for_section(section, descriptor);
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Some(
            cache
                .get(&key)
                .map(|resource| resource.state())
                .unwrap_or(ResolutionState::Unresolved),
        )
    }

    /// Merge built-in templates with the registered overrides.
    ///
    /// A string `resource` becomes a pending lazy load; an object is kept
    /// inline.
    pub fn resolve_application_templates(
        &self,
        base: &TemplateCollections,
    ) -> Result<ApplicationTemplates, ExtensionError> {
        let empty = TemplateCollections::default();
        let overrides = self
            .config
            .get()
            .map(|c| &c.template_extensions)
            .unwrap_or(&empty);

        let mut merged = base
            .named()
            .into_iter()
            .zip(overrides.named())
            .map(|((collection, built_in), (_, extra))| -> Result<Vec<TemplateEntry>, ExtensionError> {
                let entries = merge_by_id(collection, built_in, extra)?
                    .into_iter()
                    .filter_map(|entry| self.template_entry(collection, entry))
                    .collect();
                Ok(entries)
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        Ok(ApplicationTemplates {
            categories: merged.next().unwrap_or_default(),
            groups: merged.next().unwrap_or_default(),
            templates: merged.next().unwrap_or_default(),
        })
    }

    fn template_entry(&self, collection: &str, entry: Value) -> Option<TemplateEntry> {
        let Value::Object(mut fields) = entry else {
            return None;
        };
        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            _ => return None,
        };
        let resource = match fields.remove("resource") {
            None | Some(Value::Null) => None,
            Some(Value::String(path)) => {
                let key = ExtensionKey::for_template(collection, &id, &path);
                let resource = self.lazy_resource(&key, &path);
                Some(TemplateResource::Pending(LoadableRef {
                    key,
                    resource_path: path,
                    meta: Map::new(),
                    resource,
                }))
            }
            Some(inline) => Some(TemplateResource::Inline(inline)),
        };
        Some(TemplateEntry {
            id,
            fields,
            resource,
        })
    }

    fn find(
        &self,
        section: &str,
        predicate: impl Fn(&ExtensionDescriptor) -> bool,
    ) -> Option<&ExtensionDescriptor> {
        let config = self.config.get()?;
        let found = config
            .sections
            .get(section)?
            .iter()
            .find(|d| d.enabled && predicate(*d));
        if found.is_none() {
            debug!("No enabled extension in section '{}'", section);
        }
        found
    }

    fn loadable(&self, key: ExtensionKey, descriptor: &ExtensionDescriptor) -> LoadableRef {
        let resource = self.lazy_resource(&key, &descriptor.resource_path);
        LoadableRef {
            key,
            resource_path: descriptor.resource_path.clone(),
            meta: descriptor.meta.clone(),
            resource,
        }
    }

    fn lazy_resource(&self, key: &ExtensionKey, resource_path: &str) -> Arc<LazyResource<Value>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(key.clone())
            .or_insert_with(|| {
                debug!("Creating lazy resource for {}", key);
                let module_loader = self.loader.clone();
                let path = resource_path.to_string();
                let loader: Loader<Value> = Arc::new(move || module_loader.load(&path));
                Arc::new(LazyResource::new(resource_path, loader))
            })
            .clone()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .cache
            .lock()
            .map(|c| c.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len());
        f.debug_struct("ExtensionRegistry")
            .field("registered", &self.is_registered())
            .field("cached", &cached)
            .finish()
    }
}
