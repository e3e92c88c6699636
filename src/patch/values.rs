//! Proposed values collected from an edit form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A proposed value for one attribute key.
///
/// Checkbox groups submit a list of checked option names; every other field
/// submits a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposedValue {
    Single(String),
    List(Vec<String>),
}

impl ProposedValue {
    /// True for the empty string and the empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Whether the value contains `option`, as a checked-options list does.
    pub fn contains(&self, option: &str) -> bool {
        match self {
            Self::Single(s) => s == option,
            Self::List(items) => items.iter().any(|item| item == option),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl From<&str> for ProposedValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ProposedValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ProposedValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ProposedValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Attribute name → proposed value, in form order.
///
/// Built fresh for each submit and consumed once by the synthesizer. A key
/// that is absent means "untouched"; an empty string means "clear".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingValueSet {
    values: IndexMap<String, ProposedValue>,
}

impl PendingValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a proposed value, replacing any earlier value for the key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ProposedValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`PendingValueSet::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ProposedValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ProposedValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Checked options submitted under a boolean attribute's own key.
    pub fn checked_options(&self, name: &str) -> Option<&ProposedValue> {
        self.values.get(name)
    }

    /// Entries whose first dotted segment equals `first`, in form order.
    pub fn with_first_segment<'a>(
        &'a self,
        first: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a ProposedValue)> + 'a {
        self.values
            .iter()
            .filter(move |(key, _)| crate::schema::registry::first_segment(key) == first)
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProposedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PendingValueSet
where
    K: Into<String>,
    V: Into<ProposedValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}
