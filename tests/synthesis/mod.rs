//! End-to-end PATCH synthesis over the embedded user profile schema.

use crate::common::{ENTERPRISE, WSO2, embedded_schema, init_logging};
use scim_console::patch::PATCH_OP_SCHEMA;
use scim_console::schema::AttributeSchema;
use scim_console::{
    ConsoleConfig, PatchConfig, PatchOp, PatchOperation, PatchSynthesizer, PendingValueSet,
    ProfileSchema,
};
use serde_json::{Value, json};

fn synthesize(proposed: &PendingValueSet) -> Vec<PatchOperation> {
    init_logging();
    let schema = embedded_schema();
    let config = PatchConfig::default();
    let current = json!({
        "id": "u1",
        "userName": "jane",
        "name": {"givenName": "J"},
        "emails": ["old@x.com"]
    });
    PatchSynthesizer::new(&schema, &config).synthesize(&current, proposed)
}

#[test]
fn test_read_only_edits_are_dropped() {
    let ops = synthesize(
        &PendingValueSet::new()
            .with("id", "other")
            .with("userName", "changed")
            .with("lastLoginTime", "2024-01-01T00:00:00Z"),
    );
    assert!(ops.is_empty());
}

#[test]
fn test_only_proposed_keys_are_emitted() {
    let ops = synthesize(&PendingValueSet::new().with("nickName", "JJ"));
    assert_eq!(ops, vec![PatchOperation::replace(json!({"nickName": "JJ"}))]);
}

#[test]
fn test_full_profile_edit() {
    let proposed = PendingValueSet::new()
        .with("name.givenName", "Jane")
        .with("emails", "jane@x.com")
        .with("emails.work", "jane@work.com")
        .with("phoneNumbers.home", "+1 555 0100")
        .with("addresses.home", "1 Main St")
        .with("locale", "en-gb")
        .with("roles.default", "admin")
        .with("accountLocked", vec!["accountLocked"])
        .with("country", "LK")
        .with("manager.displayName", "Kim");

    let ops = synthesize(&proposed);

    assert_eq!(
        ops,
        vec![
            PatchOperation::replace(json!({"name": {"givenName": "Jane"}})),
            PatchOperation::replace(json!({
                "emails": ["jane@x.com", {"type": "work", "value": "jane@work.com"}]
            })),
            PatchOperation::replace(json!({
                "phoneNumbers": [{"type": "home", "value": "+1 555 0100"}]
            })),
            PatchOperation::add(json!({
                "addresses": [{"formatted": "1 Main St", "type": "home"}]
            })),
            PatchOperation::replace(json!({"locale": "en_GB"})),
            PatchOperation::replace(json!({WSO2: {"accountLocked": true}})),
            PatchOperation::replace(json!({WSO2: {"country": "LK"}})),
            PatchOperation::replace(json!({ENTERPRISE: {"manager": {"displayName": "Kim"}}})),
        ]
    );
}

#[test]
fn test_every_fragment_is_keyed_by_its_root_attribute() {
    let ops = synthesize(
        &PendingValueSet::new()
            .with("name.familyName", "Doe")
            .with("photos.thumbnail", "https://img/x.png")
            .with("employeeNumber", "42"),
    );

    let roots: Vec<&str> = ops
        .iter()
        .map(|op| {
            let object = op.value.as_ref().and_then(Value::as_object).unwrap();
            assert_eq!(object.len(), 1);
            object.keys().next().unwrap().as_str()
        })
        .collect();
    assert_eq!(roots, vec!["name", "photos", ENTERPRISE]);
}

#[test]
fn test_unchecked_boolean_is_false() {
    let ops = synthesize(&PendingValueSet::new().with("accountLocked", Vec::<String>::new()));
    assert_eq!(
        ops,
        vec![PatchOperation::replace(json!({WSO2: {"accountLocked": false}}))]
    );
}

#[test]
fn test_request_wire_format() {
    let schema = embedded_schema();
    let config = PatchConfig::default();
    let request = PatchSynthesizer::new(&schema, &config)
        .synthesize_request(&json!({}), &PendingValueSet::new().with("nickName", "JJ"));

    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(
        wire,
        json!({
            "Operations": [{"op": "replace", "value": {"nickName": "JJ"}}],
            "schemas": [PATCH_OP_SCHEMA]
        })
    );
}

#[test]
fn test_configured_namespace_flows_into_fragments() {
    let config = ConsoleConfig::builder()
        .with_user_profile_schema("urn:example:custom")
        .build()
        .unwrap();
    let patch_config = config.patch_config();
    let schema = ProfileSchema::with_config(
        vec![AttributeSchema::new("department").extended(None)],
        &patch_config,
    )
    .unwrap();

    let ops = PatchSynthesizer::new(&schema, &patch_config)
        .synthesize(&json!({}), &PendingValueSet::new().with("department", "R&D"));
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].op, PatchOp::Replace);
    assert_eq!(
        ops[0].value,
        Some(json!({"urn:example:custom": {"department": "R&D"}}))
    );
}
