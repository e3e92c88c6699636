//! SCIM PATCH wire types (RFC 7644 Section 3.5.2).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message schema URN carried by every PATCH body.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// PATCH operation kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

/// A single SCIM PATCH operation.
///
/// `remove` operations address their target with `path` only and never carry a
/// value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    /// Path-less `replace` merging `value` into the resource root.
    pub fn replace(value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: None,
            value: Some(value),
        }
    }

    /// Path-less `add` merging `value` into the resource root.
    pub fn add(value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: None,
            value: Some(value),
        }
    }

    /// `remove` addressed by a path or path filter.
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: Some(path.into()),
            value: None,
        }
    }
}

/// A complete PATCH request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchRequest {
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOperation>,
    pub schemas: Vec<String>,
}

impl PatchRequest {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            operations,
            schemas: vec![PATCH_OP_SCHEMA.to_string()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

impl From<Vec<PatchOperation>> for PatchRequest {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self::new(operations)
    }
}
