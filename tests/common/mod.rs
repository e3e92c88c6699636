//! Shared fixtures for integration tests.

use scim_console::error::TransportError;
use scim_console::patch::PatchRequest;
use scim_console::{ConsoleConfig, PatchTransport, ProfileSchema};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub const WSO2: &str = "urn:scim:wso2:schema";
pub const ENTERPRISE: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
pub const ORIGIN: &str = "https://localhost:9443";

/// Route log output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn embedded_schema() -> ProfileSchema {
    ProfileSchema::with_embedded_user_profile().expect("embedded schema compiles")
}

pub fn console_config(user_roles_v3: bool) -> ConsoleConfig {
    let builder = ConsoleConfig::builder().with_server_origin(ORIGIN);
    let builder = if user_roles_v3 {
        builder.enable_user_roles_v3()
    } else {
        builder
    };
    builder.build().expect("valid console config")
}

/// Write `files` (relative path → content) under `root`.
pub fn write_fixtures(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
}

/// Transport that records every request and fails configured endpoints
/// with the given response body.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(String, PatchRequest)>>,
    pub failures: HashMap<String, (u16, Option<Value>)>,
}

impl RecordingTransport {
    pub fn failing(mut self, endpoint: &str, status: u16, body: Option<Value>) -> Self {
        self.failures.insert(endpoint.to_string(), (status, body));
        self
    }

    pub fn sent(&self) -> Vec<(String, PatchRequest)> {
        self.sent.lock().unwrap().clone()
    }
}

impl PatchTransport for RecordingTransport {
    fn patch(
        &self,
        endpoint: &str,
        request: &PatchRequest,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        self.sent
            .lock()
            .unwrap()
            .push((endpoint.to_string(), request.clone()));
        let result = match self.failures.get(endpoint) {
            Some((status, body)) => Err(TransportError::status(endpoint, *status, body.clone())),
            None => Ok(()),
        };
        async move { result }
    }
}
