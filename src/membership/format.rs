//! PATCH body formats for membership changes.
//!
//! Two role/group APIs coexist. The V2 API nests members under the target
//! attribute and addresses removals with `attr[value eq id]`. The V3 API is
//! scoped to a sub-resource (`/Roles/{id}/Users`) and takes a flat member
//! array with `value eq id` removal filters. Both consume the same
//! [`MembershipDelta`].

use super::reconciler::{EntityRef, MembershipDelta};
use crate::patch::PatchOperation;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Multi-valued attribute on the parent resource that holds the members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTarget {
    /// `users` on a role
    Users,
    /// `groups` on a role
    Groups,
    /// `members` on a group
    Members,
}

impl MembershipTarget {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Groups => "groups",
            Self::Members => "members",
        }
    }
}

impl fmt::Display for MembershipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Serialization strategy from a membership delta to PATCH operations.
pub trait PatchFormat: fmt::Debug + Send + Sync {
    /// One `add` carrying every added entity as `{display, value}`.
    fn add_operation(&self, target: MembershipTarget, added: &[EntityRef]) -> PatchOperation;

    /// One `remove` addressing a single entity by id.
    fn remove_operation(&self, target: MembershipTarget, entity: &EntityRef) -> PatchOperation;

    /// The add (when anything was added) followed by one remove per entity.
    fn operations(&self, target: MembershipTarget, delta: &MembershipDelta) -> Vec<PatchOperation> {
        let mut operations = Vec::with_capacity(delta.removed.len() + 1);
        if !delta.added.is_empty() {
            operations.push(self.add_operation(target, &delta.added));
        }
        operations.extend(
            delta
                .removed
                .iter()
                .map(|entity| self.remove_operation(target, entity)),
        );
        operations
    }
}

/// V2 nested-value format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyNestedFormat;

impl LegacyNestedFormat {
    /// Remove by display name, as the legacy administrator-revoke flow does.
    pub fn remove_by_display(&self, target: MembershipTarget, display: &str) -> PatchOperation {
        PatchOperation::remove(format!("{target}[display eq {display}]"))
    }
}

impl PatchFormat for LegacyNestedFormat {
    fn add_operation(&self, target: MembershipTarget, added: &[EntityRef]) -> PatchOperation {
        let mut body = serde_json::Map::with_capacity(1);
        body.insert(target.attribute().to_string(), member_values(added));
        PatchOperation::add(Value::Object(body))
    }

    fn remove_operation(&self, target: MembershipTarget, entity: &EntityRef) -> PatchOperation {
        PatchOperation::remove(format!("{target}[value eq {}]", entity.id))
    }
}

/// V3 flat path-filter format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPathFormat;

impl PatchFormat for FlatPathFormat {
    fn add_operation(&self, _target: MembershipTarget, added: &[EntityRef]) -> PatchOperation {
        PatchOperation::add(member_values(added))
    }

    fn remove_operation(&self, _target: MembershipTarget, entity: &EntityRef) -> PatchOperation {
        PatchOperation::remove(format!("value eq {}", entity.id))
    }
}

/// Which membership format a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchFormatKind {
    #[default]
    Legacy,
    V3,
}

impl PatchFormatKind {
    /// Map the `userRolesV3` feature flag to a format.
    pub fn from_feature_flag(user_roles_v3: bool) -> Self {
        if user_roles_v3 { Self::V3 } else { Self::Legacy }
    }

    pub fn strategy(&self) -> Box<dyn PatchFormat> {
        match self {
            Self::Legacy => Box::new(LegacyNestedFormat),
            Self::V3 => Box::new(FlatPathFormat),
        }
    }
}

/// `[{display, value}]`, falling back to the id when no display is known.
fn member_values(entities: &[EntityRef]) -> Value {
    Value::Array(
        entities
            .iter()
            .map(|e| json!({ "display": e.display.as_deref().unwrap_or(&e.id), "value": e.id }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::reconcile;
    use crate::patch::PatchOp;

    fn delta() -> MembershipDelta {
        reconcile(
            &[EntityRef::with_display("u1", "alice"), EntityRef::with_display("u2", "bob")],
            &[
                EntityRef::with_display("u2", "bob"),
                EntityRef::with_display("u3", "carol"),
                EntityRef::new("u4"),
            ],
        )
    }

    #[test]
    fn test_legacy_format() {
        let ops = LegacyNestedFormat.operations(MembershipTarget::Users, &delta());
        assert_eq!(
            ops,
            vec![
                PatchOperation::add(json!({"users": [
                    {"display": "carol", "value": "u3"},
                    {"display": "u4", "value": "u4"}
                ]})),
                PatchOperation::remove("users[value eq u1]"),
            ]
        );
    }

    #[test]
    fn test_v3_format() {
        let ops = FlatPathFormat.operations(MembershipTarget::Users, &delta());
        assert_eq!(
            ops,
            vec![
                PatchOperation::add(json!([
                    {"display": "carol", "value": "u3"},
                    {"display": "u4", "value": "u4"}
                ])),
                PatchOperation::remove("value eq u1"),
            ]
        );
    }

    #[test]
    fn test_one_remove_per_entity_and_no_empty_add() {
        let delta = reconcile(
            &[EntityRef::new("g1"), EntityRef::new("g2")],
            &[],
        );
        let ops = LegacyNestedFormat.operations(MembershipTarget::Members, &delta);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| op.op == PatchOp::Remove && op.value.is_none()));
        assert_eq!(ops[1].path.as_deref(), Some("members[value eq g2]"));
    }

    #[test]
    fn test_empty_delta_yields_nothing() {
        for kind in [PatchFormatKind::Legacy, PatchFormatKind::V3] {
            assert!(
                kind.strategy()
                    .operations(MembershipTarget::Groups, &MembershipDelta::default())
                    .is_empty()
            );
        }
    }

    #[test]
    fn test_feature_flag_selects_strategy() {
        assert_eq!(PatchFormatKind::from_feature_flag(true), PatchFormatKind::V3);
        assert_eq!(PatchFormatKind::from_feature_flag(false), PatchFormatKind::Legacy);
        let op = PatchFormatKind::V3
            .strategy()
            .remove_operation(MembershipTarget::Groups, &EntityRef::new("g9"));
        assert_eq!(op.path.as_deref(), Some("value eq g9"));
    }

    #[test]
    fn test_remove_by_display() {
        let op = LegacyNestedFormat.remove_by_display(MembershipTarget::Users, "jane");
        assert_eq!(op, PatchOperation::remove("users[display eq jane]"));
    }
}
