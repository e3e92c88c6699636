//! Core profile schema type definitions.
//!
//! This module contains the attribute descriptions the console receives from the
//! backend's profile schema endpoint, and the [`AttributeShape`] each entry is
//! compiled into before any PATCH operation is synthesized.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Definition of one logical profile field.
///
/// Names are dotted paths such as `name.givenName` or `emails.work`. The
/// `extended` flag places the attribute under an extension namespace
/// (`schema_id`, or the configured default profile URN when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSchema {
    /// Dotted attribute path
    pub name: String,
    /// Mutability characteristics
    #[serde(default)]
    pub mutability: Mutability,
    /// Whether this attribute can have multiple values
    #[serde(rename = "multiValued", default)]
    pub multiplicity: Multiplicity,
    /// Whether the attribute lives under an extension namespace
    #[serde(default)]
    pub extended: bool,
    /// Value type; only booleans receive special handling
    #[serde(rename = "type", default)]
    pub value_type: ValueType,
    /// Presentation order, unused by synthesis
    #[serde(default)]
    pub display_order: i32,
    /// Extension namespace URN for extended attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
}

impl AttributeSchema {
    /// Create a read-write, single-valued string attribute.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mutability: Mutability::ReadWrite,
            multiplicity: Multiplicity::Single,
            extended: false,
            value_type: ValueType::String,
            display_order: 0,
            schema_id: None,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.mutability = Mutability::ReadOnly;
        self
    }

    pub fn multi_valued(mut self) -> Self {
        self.multiplicity = Multiplicity::MultiValued;
        self
    }

    pub fn boolean(mut self) -> Self {
        self.value_type = ValueType::Boolean;
        self
    }

    /// Mark the attribute as extended, optionally under an explicit namespace.
    pub fn extended(mut self, schema_id: Option<&str>) -> Self {
        self.extended = true;
        self.schema_id = schema_id.map(str::to_string);
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = order;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.mutability == Mutability::ReadOnly
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multiplicity == Multiplicity::MultiValued
    }

    pub fn is_boolean(&self) -> bool {
        self.value_type == ValueType::Boolean
    }
}

/// Attribute mutability characteristics.
///
/// Only [`Mutability::ReadOnly`] excludes an attribute from synthesis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Read-only attribute (managed by server)
    #[serde(alias = "READ_ONLY", alias = "readonly")]
    ReadOnly,
    /// Read-write attribute (can be modified by clients)
    #[default]
    #[serde(alias = "READ_WRITE", alias = "readwrite")]
    ReadWrite,
    /// Immutable attribute (set once, never modified)
    Immutable,
    /// Write-only attribute (passwords, etc.)
    WriteOnly,
}

/// Whether an attribute holds one value or an array of values.
///
/// Serialized as the SCIM `multiValued` boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Multiplicity {
    #[default]
    Single,
    MultiValued,
}

impl Serialize for Multiplicity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*self == Self::MultiValued)
    }
}

impl<'de> Deserialize<'de> for Multiplicity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(if bool::deserialize(deserializer)? {
            Self::MultiValued
        } else {
            Self::Single
        })
    }
}

/// Attribute value types the synthesizer distinguishes.
///
/// Profile schemas use SCIM type names in either case (`"BOOLEAN"`,
/// `"boolean"`). Every type other than boolean is carried as a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueType {
    #[default]
    String,
    Boolean,
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Self::String => "string",
            Self::Boolean => "boolean",
        })
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw.eq_ignore_ascii_case("boolean") {
            Self::Boolean
        } else {
            Self::String
        })
    }
}

/// How an attribute's proposed value is turned into a PATCH fragment.
///
/// Computed once when a [`super::ProfileSchema`] is built, so synthesis never
/// re-parses dotted names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeShape {
    /// `attr` → `{attr: value}`
    Flat,
    /// `attr` under a namespace → `{urn: {attr: value}}`
    FlatExtended { namespace: String },
    /// Leader of a multi-valued group; aggregates every proposed key whose
    /// first segment is `attribute` into `{attribute: [..]}`
    MultiValued { attribute: String },
    /// `name.part` → `{name: {part: value}}`
    NestedName { part: String },
    /// `parent.child` under a namespace → `{urn: {parent: {child: value}}}`
    NestedExtended {
        namespace: String,
        parent: String,
        child: String,
    },
    /// `parent.type` → `{parent: [{type, value}]}`
    TypedSubAttribute { parent: String, sub_type: String },
    /// `addresses.type` → add `{addresses: [{formatted, type}]}`
    Address { address_type: String },
    /// Member of a multi-valued group whose leader emits the fragment
    Aggregated,
    /// Never patched
    Ignored,
}

impl AttributeShape {
    /// Whether this shape ever produces its own fragment.
    pub fn emits(&self) -> bool {
        !matches!(self, Self::Aggregated | Self::Ignored)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::FlatExtended { .. } => "flat-extended",
            Self::MultiValued { .. } => "multi-valued",
            Self::NestedName { .. } => "nested-name",
            Self::NestedExtended { .. } => "nested-extended",
            Self::TypedSubAttribute { .. } => "typed-sub-attribute",
            Self::Address { .. } => "address",
            Self::Aggregated => "aggregated",
            Self::Ignored => "ignored",
        }
    }
}

/// A schema entry paired with its precomputed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledAttribute {
    pub schema: AttributeSchema,
    pub shape: AttributeShape,
}

impl CompiledAttribute {
    pub fn name(&self) -> &str {
        &self.schema.name
    }
}
