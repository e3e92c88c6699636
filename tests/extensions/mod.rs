//! Extension registry resolution against fragments on disk.

use crate::common::{init_logging, write_fixtures};
use scim_console::error::LoadError;
use scim_console::extensions::{
    ExtensionRegistry, ExtensionType, ExtensionsConfig, FsModuleLoader, Resolution,
    ResolutionFailure, ResolutionState, TemplateCollections, TemplateResource,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const EXTENSIONS: &str = r#"{
    "sections": {
        "users": [
            {"component": "user-edit", "type": "tab", "resourcePath": "users/sessions.json"},
            {"component": "user-edit", "subComponent": "danger-zone", "type": "component",
             "resourcePath": "users/missing.json"}
        ],
        "groups": [
            {"component": "group-edit", "type": "tab", "resourcePath": "groups/broken.json"},
            {"component": "group-edit", "type": "component", "resourcePath": "groups/off.json",
             "enabled": false}
        ]
    },
    "templateExtensions": {
        "templates": [
            {"id": "custom-app", "name": "Custom", "resource": "templates/custom.json"}
        ]
    },
    "routes": [
        {"component": "insights", "type": "route", "resourcePath": "routes/insights.json",
         "meta": {"path": "/insights"}}
    ]
}"#;

fn fixture() -> (TempDir, ExtensionRegistry) {
    init_logging();
    let dir = TempDir::new().unwrap();
    write_fixtures(
        dir.path(),
        &[
            ("users/sessions.json", r#"{"title": "Active Sessions"}"#),
            ("groups/broken.json", r#"{"title": "#),
            ("routes/insights.json", r#"{"component": "InsightsPage"}"#),
            ("templates/custom.json", r#"{"inboundProtocols": ["oidc"]}"#),
            ("extensions.json", EXTENSIONS),
        ],
    );

    let config = ExtensionsConfig::from_file(dir.path().join("extensions.json")).unwrap();
    let registry = ExtensionRegistry::with_loader(FsModuleLoader::new(dir.path()));
    registry.register(config).unwrap();
    (dir, registry)
}

#[tokio::test]
async fn test_resolves_tab_from_disk() {
    let (_dir, registry) = fixture();
    assert_eq!(
        registry.state("users", ExtensionType::Tab),
        Some(ResolutionState::Unresolved)
    );

    let tab = registry.resolve_component("users", ExtensionType::Tab).unwrap();
    let value = tab.load().await.into_result().unwrap();
    assert_eq!(value["title"], "Active Sessions");
    assert_eq!(
        registry.state("users", ExtensionType::Tab),
        Some(ResolutionState::Resolved)
    );
}

#[tokio::test]
async fn test_broken_and_missing_fragments_fall_back() {
    let (_dir, registry) = fixture();

    let broken = registry.resolve_component("groups", ExtensionType::Tab).unwrap();
    assert!(matches!(
        broken.load().await,
        Resolution::Fallback(ResolutionFailure::Load(LoadError::Malformed { .. }))
    ));

    let missing = registry
        .resolve_sub_component("users", ExtensionType::Component, "user-edit", Some("danger-zone"))
        .unwrap();
    assert!(matches!(
        missing.load().await,
        Resolution::Fallback(ResolutionFailure::Load(LoadError::NotFound { .. }))
    ));
    assert_eq!(missing.state(), ResolutionState::Failed);

    assert!(registry.resolve_component("groups", ExtensionType::Component).is_none());
}

#[tokio::test]
async fn test_concurrent_loads_share_one_resolution() {
    let (dir, registry) = fixture();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let tab = registry.resolve_component("users", ExtensionType::Tab).unwrap();
                tab.load().await.into_result().unwrap()
            })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }
    assert!(values.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));

    // The cached outcome survives the file changing underneath it.
    std::fs::write(dir.path().join("users/sessions.json"), r#"{"title": "Changed"}"#).unwrap();
    let tab = registry.resolve_component("users", ExtensionType::Tab).unwrap();
    assert_eq!(tab.load().await.value().unwrap()["title"], "Active Sessions");
}

#[test]
fn test_routes_resolve_outside_a_runtime_until_loaded() {
    let (_dir, registry) = fixture();
    let routes = registry.resolve_routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].meta()["path"], "/insights");
    assert_eq!(routes[0].state(), ResolutionState::Unresolved);

    let resolution = tokio_test::block_on(routes[0].load());
    assert_eq!(resolution.value().unwrap()["component"], "InsightsPage");
}

#[tokio::test]
async fn test_application_templates_from_disk() {
    let (_dir, registry) = fixture();
    let base = TemplateCollections {
        templates: vec![json!({"id": "oidc-web", "name": "OIDC Web"})],
        ..Default::default()
    };

    let merged = registry.resolve_application_templates(&base).unwrap();
    let ids: Vec<&str> = merged.templates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["oidc-web", "custom-app"]);

    let custom = merged.template("custom-app").unwrap();
    let Some(TemplateResource::Pending(resource)) = &custom.resource else {
        panic!("expected a pending template resource");
    };
    assert_eq!(resource.state(), ResolutionState::Unresolved);
    let body = resource.load().await.into_result().unwrap();
    assert_eq!(body["inboundProtocols"], json!(["oidc"]));
}
