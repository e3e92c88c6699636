//! Compiled profile schema set.
//!
//! [`ProfileSchema`] loads attribute entries from JSON, checks that names are
//! unique and well formed, and assigns every entry its [`AttributeShape`].

use super::embedded;
use super::types::{AttributeSchema, AttributeShape, CompiledAttribute};
use crate::config::{DEFAULT_PROFILE_SCHEMA_URN, PatchConfig};
use crate::error::{ConsoleResult, SchemaError};

use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

const NAME_ATTRIBUTE: &str = "name";
const ADDRESSES_ATTRIBUTE: &str = "addresses";
const EMAILS_ATTRIBUTE: &str = "emails";
const PHONE_NUMBERS_ATTRIBUTE: &str = "phoneNumbers";
const DEFAULT_ROLES_ATTRIBUTE: &str = "roles.default";

/// An ordered, validated set of profile attributes.
///
/// Iteration order is the order entries were supplied. Synthesis results do not
/// depend on it beyond the order of emitted operations.
#[derive(Debug, Clone)]
pub struct ProfileSchema {
    attributes: Vec<CompiledAttribute>,
    index: HashMap<String, usize>,
    default_namespace: String,
}

impl ProfileSchema {
    /// Compile a schema set, resolving extended attributes without an explicit
    /// `schemaId` to `default_namespace`.
    pub fn new(
        entries: Vec<AttributeSchema>,
        default_namespace: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let default_namespace = default_namespace.into();
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let segments: Vec<&str> = entry.name.split('.').collect();
            if entry.name.is_empty() || segments.iter().any(|s| s.is_empty()) {
                return Err(SchemaError::EmptyAttributeName {
                    name: entry.name.clone(),
                });
            }
            if segments.len() > 2 {
                return Err(SchemaError::TooManySegments {
                    name: entry.name.clone(),
                    segments: segments.len(),
                });
            }
            if index.insert(entry.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateAttribute {
                    name: entry.name.clone(),
                });
            }
        }

        let groups = Self::multi_valued_groups(&entries);
        let mut leaders: HashSet<String> = HashSet::new();

        let attributes = entries
            .into_iter()
            .map(|schema| {
                let shape = Self::shape_of(&schema, &default_namespace, &groups, &mut leaders);
                trace!("Compiled attribute '{}' as {:?}", schema.name, shape);
                CompiledAttribute { schema, shape }
            })
            .collect::<Vec<_>>();

        debug!(
            "Compiled profile schema with {} attributes (default namespace {})",
            attributes.len(),
            default_namespace
        );

        Ok(Self {
            attributes,
            index,
            default_namespace,
        })
    }

    /// Compile a schema set using the configured default extension namespace.
    pub fn with_config(
        entries: Vec<AttributeSchema>,
        config: &PatchConfig,
    ) -> Result<Self, SchemaError> {
        Self::new(entries, config.default_extension_schema.clone())
    }

    /// Load the embedded user profile schema under the default WSO2 namespace.
    pub fn with_embedded_user_profile() -> ConsoleResult<Self> {
        Self::from_json_str(embedded::user_profile_schema(), DEFAULT_PROFILE_SCHEMA_URN)
    }

    /// Load a schema set from a JSON array of attribute entries.
    pub fn from_json_str(content: &str, default_namespace: &str) -> ConsoleResult<Self> {
        let entries: Vec<AttributeSchema> = serde_json::from_str(content)?;
        Ok(Self::new(entries, default_namespace)?)
    }

    /// Load a schema set from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P, default_namespace: &str) -> ConsoleResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, default_namespace)
    }

    /// First segments that name a multi-valued group.
    ///
    /// A group exists when a single-segment entry is multi-valued, and
    /// `phoneNumbers` is always treated as one.
    fn multi_valued_groups(entries: &[AttributeSchema]) -> HashSet<String> {
        let mut groups: HashSet<String> = entries
            .iter()
            .filter(|e| !e.extended && e.is_multi_valued() && !e.name.contains('.'))
            .map(|e| e.name.clone())
            .collect();

        if entries
            .iter()
            .any(|e| !e.extended && first_segment(&e.name) == PHONE_NUMBERS_ATTRIBUTE)
        {
            groups.insert(PHONE_NUMBERS_ATTRIBUTE.to_string());
        }
        groups
    }

    fn shape_of(
        schema: &AttributeSchema,
        default_namespace: &str,
        groups: &HashSet<String>,
        leaders: &mut HashSet<String>,
    ) -> AttributeShape {
        if schema.name == DEFAULT_ROLES_ATTRIBUTE {
            return AttributeShape::Ignored;
        }

        let (parent, child) = match schema.name.split_once('.') {
            Some((parent, child)) => (parent, Some(child)),
            None => (schema.name.as_str(), None),
        };

        if schema.extended {
            let namespace = schema
                .schema_id
                .clone()
                .unwrap_or_else(|| default_namespace.to_string());
            return match child {
                None => AttributeShape::FlatExtended { namespace },
                Some(child) => AttributeShape::NestedExtended {
                    namespace,
                    parent: parent.to_string(),
                    child: child.to_string(),
                },
            };
        }

        // Only a writable entry may lead its group.
        if groups.contains(parent) {
            return if !schema.is_read_only() && leaders.insert(parent.to_string()) {
                AttributeShape::MultiValued {
                    attribute: parent.to_string(),
                }
            } else {
                AttributeShape::Aggregated
            };
        }

        match child {
            None => AttributeShape::Flat,
            Some(part) if parent == NAME_ATTRIBUTE => AttributeShape::NestedName {
                part: part.to_string(),
            },
            Some(address_type) if parent == ADDRESSES_ATTRIBUTE => AttributeShape::Address {
                address_type: address_type.to_string(),
            },
            // Typed emails only exist as members of a multi-valued group.
            Some(_) if parent == EMAILS_ATTRIBUTE => AttributeShape::Ignored,
            Some(sub_type) => AttributeShape::TypedSubAttribute {
                parent: parent.to_string(),
                sub_type: sub_type.to_string(),
            },
        }
    }

    /// Iterate over compiled attributes in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledAttribute> {
        self.attributes.iter()
    }

    /// Look up a compiled attribute by its dotted name.
    pub fn get(&self, name: &str) -> Option<&CompiledAttribute> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Namespace used for extended attributes without an explicit `schemaId`.
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Distinct extension namespaces referenced by extended attributes.
    pub fn extension_namespaces(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.attributes
            .iter()
            .filter_map(|a| match &a.shape {
                AttributeShape::FlatExtended { namespace }
                | AttributeShape::NestedExtended { namespace, .. } => Some(namespace.as_str()),
                _ => None,
            })
            .filter(|ns| seen.insert(*ns))
            .collect()
    }

    /// Attributes sorted by `displayOrder`, for presentation.
    pub fn in_display_order(&self) -> Vec<&CompiledAttribute> {
        let mut sorted: Vec<&CompiledAttribute> = self.attributes.iter().collect();
        sorted.sort_by_key(|a| a.schema.display_order);
        sorted
    }
}

/// First dotted segment of an attribute name or proposed key.
pub(crate) fn first_segment(name: &str) -> &str {
    name.split_once('.').map_or(name, |(first, _)| first)
}
