//! PATCH operation synthesis from proposed profile edits.
//!
//! Every writable schema entry that has a proposed value produces one
//! independent fragment. Fragments are never merged by target, so the applied
//! state does not depend on the order the backend processes them in.

use super::operation::{PatchOperation, PatchRequest};
use super::values::{PendingValueSet, ProposedValue};
use crate::config::PatchConfig;
use crate::schema::{AttributeShape, CompiledAttribute, ProfileSchema};

use log::{Level, debug, log_enabled, trace};
use serde_json::{Map, Value, json};

const EMAILS_ATTRIBUTE: &str = "emails";
const LOCALE_ATTRIBUTE: &str = "locale";
const LOCALE_JOINING_SYMBOL: char = '_';

/// The resource as last fetched from the backend.
pub type ResourceSnapshot = Value;

/// Converts proposed form values into SCIM PATCH operations.
///
/// # Examples
///
/// ```rust
/// use scim_console::config::PatchConfig;
/// use scim_console::patch::{PatchSynthesizer, PendingValueSet};
/// use scim_console::schema::{AttributeSchema, ProfileSchema};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = ProfileSchema::new(
///     vec![AttributeSchema::new("name.givenName"), AttributeSchema::new("userName").read_only()],
///     "urn:scim:wso2:schema",
/// )?;
/// let proposed = PendingValueSet::new()
///     .with("name.givenName", "Jane")
///     .with("userName", "jane@x.com");
///
/// let config = PatchConfig::default();
/// let ops = PatchSynthesizer::new(&schema, &config).synthesize(&json!({}), &proposed);
/// assert_eq!(ops.len(), 1);
/// assert_eq!(ops[0].value, Some(json!({"name": {"givenName": "Jane"}})));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PatchSynthesizer<'a> {
    schema: &'a ProfileSchema,
    config: &'a PatchConfig,
}

impl<'a> PatchSynthesizer<'a> {
    pub fn new(schema: &'a ProfileSchema, config: &'a PatchConfig) -> Self {
        Self { schema, config }
    }

    /// Produce the operations that move `current` to the proposed state.
    ///
    /// Read-only entries and entries without a proposed key are skipped. An
    /// empty proposed string is an explicit clear and still emits a fragment.
    pub fn synthesize(
        &self,
        current: &ResourceSnapshot,
        proposed: &PendingValueSet,
    ) -> Vec<PatchOperation> {
        let operations: Vec<PatchOperation> = self
            .schema
            .iter()
            .filter(|attribute| !attribute.schema.is_read_only())
            .filter_map(|attribute| self.fragment_for(attribute, current, proposed))
            .collect();

        debug!(
            "Synthesized {} PATCH operations from {} proposed values",
            operations.len(),
            proposed.len()
        );
        operations
    }

    /// [`PatchSynthesizer::synthesize`] wrapped in a request body.
    pub fn synthesize_request(
        &self,
        current: &ResourceSnapshot,
        proposed: &PendingValueSet,
    ) -> PatchRequest {
        PatchRequest::new(self.synthesize(current, proposed))
    }

    fn fragment_for(
        &self,
        attribute: &CompiledAttribute,
        current: &ResourceSnapshot,
        proposed: &PendingValueSet,
    ) -> Option<PatchOperation> {
        let name = attribute.name();

        if let AttributeShape::MultiValued { attribute: group } = &attribute.shape {
            return self.aggregate_multi_valued(group, proposed);
        }

        let value = proposed.get(name)?;
        if !attribute.shape.emits() {
            trace!("Attribute '{}' is covered elsewhere, skipping", name);
            return None;
        }

        if log_enabled!(Level::Trace) && current_matches(current, name, value) {
            trace!("Attribute '{}' is unchanged from the snapshot", name);
        }

        let leaf = || self.leaf_value(attribute, value, proposed);

        let operation = match &attribute.shape {
            AttributeShape::Flat if name == EMAILS_ATTRIBUTE => {
                PatchOperation::replace(single_key(name, json!([value.to_json()])))
            }
            AttributeShape::Flat if name == LOCALE_ATTRIBUTE && self.config.normalize_locale => {
                PatchOperation::replace(single_key(name, normalize_locale(value)))
            }
            AttributeShape::Flat => PatchOperation::replace(single_key(name, leaf())),
            AttributeShape::FlatExtended { namespace } => {
                PatchOperation::replace(single_key(namespace, single_key(name, leaf())))
            }
            AttributeShape::NestedName { part } => {
                PatchOperation::replace(json!({ "name": single_key(part, value.to_json()) }))
            }
            AttributeShape::NestedExtended {
                namespace,
                parent,
                child,
            } => PatchOperation::replace(single_key(
                namespace,
                single_key(parent, single_key(child, leaf())),
            )),
            AttributeShape::TypedSubAttribute { parent, sub_type } => PatchOperation::replace(
                single_key(parent, json!([{ "type": sub_type, "value": leaf() }])),
            ),
            // Address sub-attributes cannot be replaced in place on the backend.
            AttributeShape::Address { address_type } => PatchOperation::add(json!({
                "addresses": [{ "formatted": value.to_json(), "type": address_type }]
            })),
            AttributeShape::MultiValued { .. }
            | AttributeShape::Aggregated
            | AttributeShape::Ignored => return None,
        };

        trace!("Fragment for '{}': {:?}", name, operation);
        Some(operation)
    }

    /// Gather every proposed key of a multi-valued group into one array.
    ///
    /// Bare keys contribute their values directly and typed keys contribute
    /// `{type, value}` objects. Empty values are dropped, and keys declared
    /// read-only never reach the array.
    fn aggregate_multi_valued(
        &self,
        group: &str,
        proposed: &PendingValueSet,
    ) -> Option<PatchOperation> {
        let mut touched = false;
        let mut values = Vec::new();

        for (key, value) in proposed.with_first_segment(group) {
            if self
                .schema
                .get(key)
                .is_some_and(|attribute| attribute.schema.is_read_only())
            {
                trace!("Read-only group member '{}' left out of '{}'", key, group);
                continue;
            }
            touched = true;
            if value.is_empty() {
                continue;
            }
            match key.split_once('.') {
                None => match value {
                    ProposedValue::Single(s) => values.push(Value::String(s.clone())),
                    ProposedValue::List(items) => values.extend(
                        items
                            .iter()
                            .filter(|item| !item.is_empty())
                            .cloned()
                            .map(Value::String),
                    ),
                },
                Some((_, sub_type)) => {
                    values.push(json!({ "type": sub_type, "value": value.to_json() }))
                }
            }
        }

        touched.then(|| PatchOperation::replace(single_key(group, Value::Array(values))))
    }

    /// The value for a leaf, applying the checked-options convention to booleans.
    fn leaf_value(
        &self,
        attribute: &CompiledAttribute,
        value: &ProposedValue,
        proposed: &PendingValueSet,
    ) -> Value {
        if attribute.schema.is_boolean() {
            let name = attribute.name();
            Value::Bool(
                proposed
                    .checked_options(name)
                    .is_some_and(|checked| checked.contains(name)),
            )
        } else {
            value.to_json()
        }
    }

    pub fn config(&self) -> &PatchConfig {
        self.config
    }
}

fn single_key(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Normalise `en-us` / `EN_US` style locales to `en_US`.
///
/// Values without a region part, and list values, pass through unchanged.
pub fn normalize_locale(value: &ProposedValue) -> Value {
    let ProposedValue::Single(locale) = value else {
        return value.to_json();
    };
    match locale.split_once(['-', '_']) {
        Some((language, region)) => Value::String(format!(
            "{}{}{}",
            language.to_lowercase(),
            LOCALE_JOINING_SYMBOL,
            region.to_uppercase()
        )),
        None => Value::String(locale.clone()),
    }
}

fn current_matches(current: &ResourceSnapshot, name: &str, value: &ProposedValue) -> bool {
    let pointer = format!("/{}", name.replace('.', "/"));
    current
        .pointer(&pointer)
        .is_some_and(|existing| *existing == value.to_json())
}
