//! Submission routing, partial application and alerts.

use crate::common::{ORIGIN, RecordingTransport, console_config, embedded_schema, init_logging};
use scim_console::membership::{EntityRef, MembershipTarget, reconcile};
use scim_console::submit::RoleEndpoints;
use scim_console::{
    Alert, AlertLevel, PatchRequest, PatchSubmitter, PatchSynthesizer, PendingValueSet,
    SubmissionOutcome,
};
use serde_json::json;

#[tokio::test]
async fn test_profile_edit_is_one_request() {
    init_logging();
    let config = console_config(false);
    let schema = embedded_schema();
    let patch_config = config.patch_config();
    let submitter = PatchSubmitter::new(RecordingTransport::default(), &config);

    let operations = PatchSynthesizer::new(&schema, &patch_config).synthesize(
        &json!({"id": "u1"}),
        &PendingValueSet::new()
            .with("nickName", "JJ")
            .with("country", "LK"),
    );
    assert!(submitter.submit_profile("u1", operations).await.unwrap());

    let sent = submitter.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, format!("{ORIGIN}/scim2/Users/u1"));
    assert_eq!(sent[0].1.len(), 2);
}

#[tokio::test]
async fn test_role_membership_follows_feature_flag() {
    let delta = reconcile(&[EntityRef::new("g1")], &[EntityRef::with_display("g2", "admins")]);

    let legacy = PatchSubmitter::new(RecordingTransport::default(), &console_config(false));
    legacy
        .submit_membership("r1", MembershipTarget::Groups, &delta)
        .await
        .unwrap();
    let sent = legacy.transport().sent();
    assert_eq!(sent[0].0, format!("{ORIGIN}/scim2/v2/Roles/r1"));
    assert_eq!(
        sent[0].1.operations[1].path.as_deref(),
        Some("groups[value eq g1]")
    );

    let v3 = PatchSubmitter::new(RecordingTransport::default(), &console_config(true));
    v3.submit_membership("r1", MembershipTarget::Groups, &delta)
        .await
        .unwrap();
    let sent = v3.transport().sent();
    assert_eq!(sent[0].0, format!("{ORIGIN}/scim2/v3/Roles/r1/Groups"));
    assert_eq!(sent[0].1.operations[1].path.as_deref(), Some("value eq g1"));
}

#[tokio::test]
async fn test_failed_submission_surfaces_backend_description() {
    let endpoint = format!("{ORIGIN}/scim2/Groups/g1");
    let transport = RecordingTransport::default().failing(
        &endpoint,
        400,
        Some(json!({"description": "Member u9 does not exist", "detail": "ignored"})),
    );
    let submitter = PatchSubmitter::new(transport, &console_config(false));
    let delta = reconcile(&[], &[EntityRef::new("u9")]);

    let error = submitter
        .submit_membership("g1", MembershipTarget::Members, &delta)
        .await
        .unwrap_err();
    assert_eq!(error.endpoint(), endpoint);

    let alert = Alert::from_transport_error(&error, "Could not update the group");
    assert_eq!(alert.level, AlertLevel::Error);
    assert_eq!(alert.description, "Member u9 does not exist");
}

#[tokio::test]
async fn test_bulk_role_assignment_partially_applies() {
    let config = console_config(false);
    let endpoints = RoleEndpoints::from_config(&config);
    let failing = endpoints.role("r2");
    let transport = RecordingTransport::default().failing(&failing, 500, None);
    let submitter = PatchSubmitter::new(transport, &config);

    let delta = reconcile(&[], &[EntityRef::with_display("u1", "alice")]);
    let requests: Vec<(String, PatchRequest)> = ["r1", "r2", "r3"]
        .iter()
        .map(|role| {
            let ops = config
                .patch_format()
                .strategy()
                .operations(MembershipTarget::Users, &delta);
            (endpoints.membership(role, MembershipTarget::Users), PatchRequest::new(ops))
        })
        .collect();

    let outcome = submitter.submit_independent(requests).await;
    assert_eq!(submitter.transport().sent().len(), 3);
    match &outcome {
        SubmissionOutcome::PartiallyApplied { applied, failed } => {
            assert_eq!(*applied, 2);
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].endpoint, failing);
        }
        other => panic!("expected partial application, got {other:?}"),
    }

    let alert = Alert::from_outcome(&outcome, "Roles assigned", "Could not assign roles");
    assert_eq!(alert.level, AlertLevel::Warning);
}
