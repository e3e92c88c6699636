//! Membership reconciliation laws and wire bodies.

use crate::common::init_logging;
use proptest::prelude::*;
use scim_console::membership::{
    EntityRef, FlatPathFormat, LegacyNestedFormat, MembershipTarget, PatchFormat,
    PatchFormatKind, reconcile,
};
use scim_console::{PatchOp, PatchRequest};
use serde_json::json;
use std::collections::HashSet;

fn entity_list() -> impl Strategy<Value = Vec<EntityRef>> {
    prop::collection::vec("[a-e][0-9]", 0..12)
        .prop_map(|ids| ids.into_iter().map(EntityRef::new).collect())
}

fn ids(entities: &[EntityRef]) -> HashSet<&str> {
    entities.iter().map(|e| e.id.as_str()).collect()
}

proptest! {
    #[test]
    fn prop_added_and_removed_are_disjoint(current in entity_list(), desired in entity_list()) {
        let delta = reconcile(&current, &desired);
        prop_assert!(ids(&delta.added).is_disjoint(&ids(&delta.removed)));
    }

    #[test]
    fn prop_reconcile_with_self_is_empty(list in entity_list()) {
        prop_assert!(reconcile(&list, &list).is_empty());
    }

    #[test]
    fn prop_swapping_arguments_inverts_delta(current in entity_list(), desired in entity_list()) {
        let forward = reconcile(&current, &desired);
        let backward = reconcile(&desired, &current);
        prop_assert_eq!(forward.inverse(), backward);
    }

    #[test]
    fn prop_applying_delta_reaches_desired(current in entity_list(), desired in entity_list()) {
        let delta = reconcile(&current, &desired);
        let removed = ids(&delta.removed);
        let mut result: HashSet<&str> = ids(&current)
            .into_iter()
            .filter(|id| !removed.contains(id))
            .collect();
        result.extend(ids(&delta.added));
        prop_assert_eq!(result, ids(&desired));
    }

    #[test]
    fn prop_operation_count_matches_delta(current in entity_list(), desired in entity_list()) {
        let delta = reconcile(&current, &desired);
        let expected = delta.removed.len() + usize::from(!delta.added.is_empty());
        for kind in [PatchFormatKind::Legacy, PatchFormatKind::V3] {
            let ops = kind.strategy().operations(MembershipTarget::Users, &delta);
            prop_assert_eq!(ops.len(), expected);
        }
    }
}

#[test]
fn test_role_users_scenario_both_formats() {
    init_logging();
    let current = vec![
        EntityRef::with_display("u1", "alice"),
        EntityRef::with_display("u2", "bob"),
    ];
    let desired = vec![
        EntityRef::with_display("u2", "bob"),
        EntityRef::with_display("u3", "carol"),
    ];
    let delta = reconcile(&current, &desired);

    let legacy = PatchRequest::new(LegacyNestedFormat.operations(MembershipTarget::Users, &delta));
    assert_eq!(
        serde_json::to_value(&legacy).unwrap()["Operations"],
        json!([
            {"op": "add", "value": {"users": [{"display": "carol", "value": "u3"}]}},
            {"op": "remove", "path": "users[value eq u1]"}
        ])
    );

    let v3 = PatchRequest::new(FlatPathFormat.operations(MembershipTarget::Users, &delta));
    assert_eq!(
        serde_json::to_value(&v3).unwrap()["Operations"],
        json!([
            {"op": "add", "value": [{"display": "carol", "value": "u3"}]},
            {"op": "remove", "path": "value eq u1"}
        ])
    );
}

#[test]
fn test_group_members_removal_only() {
    let delta = reconcile(&[EntityRef::new("g1"), EntityRef::new("g2")], &[]);
    let ops = PatchFormatKind::Legacy
        .strategy()
        .operations(MembershipTarget::Members, &delta);

    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|op| op.op == PatchOp::Remove));
    assert_eq!(ops[0].path.as_deref(), Some("members[value eq g1]"));
    assert_eq!(ops[1].path.as_deref(), Some("members[value eq g2]"));
}
