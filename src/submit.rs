//! Submission of synthesized PATCH requests.
//!
//! The HTTP client itself is a collaborator behind [`PatchTransport`]. This
//! module decides which endpoint each request goes to, sends profile edits
//! and membership deltas as single atomic requests, and reports the outcome
//! of several independent calls without rolling anything back.

use crate::config::{ConsoleConfig, Endpoints};
use crate::error::TransportError;
use crate::membership::{MembershipDelta, MembershipTarget, PatchFormatKind};
use crate::patch::{PatchOperation, PatchRequest};

use futures::future::join_all;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Sends one PATCH request to a SCIM endpoint.
pub trait PatchTransport: Send + Sync {
    fn patch(
        &self,
        endpoint: &str,
        request: &PatchRequest,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// URL builder for users, groups and role memberships.
#[derive(Debug, Clone)]
pub struct RoleEndpoints {
    endpoints: Endpoints,
    format: PatchFormatKind,
}

impl RoleEndpoints {
    pub fn new(endpoints: Endpoints, format: PatchFormatKind) -> Self {
        Self { endpoints, format }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.endpoints.clone(), config.patch_format())
    }

    pub fn user(&self, id: &str) -> String {
        format!("{}/{id}", self.endpoints.users)
    }

    pub fn group(&self, id: &str) -> String {
        format!("{}/{id}", self.endpoints.groups)
    }

    pub fn role(&self, id: &str) -> String {
        format!("{}/{id}", self.endpoints.roles)
    }

    /// Where a membership change on `parent_id` is sent.
    ///
    /// Group members always go to the group. Role users and groups go to the
    /// role itself on V2, and to the `Users`/`Groups` sub-resource on V3.
    pub fn membership(&self, parent_id: &str, target: MembershipTarget) -> String {
        match (target, self.format) {
            (MembershipTarget::Members, _) => self.group(parent_id),
            (_, PatchFormatKind::Legacy) => self.role(parent_id),
            (MembershipTarget::Users, PatchFormatKind::V3) => {
                format!("{}/{parent_id}/Users", self.endpoints.roles_v3)
            }
            (MembershipTarget::Groups, PatchFormatKind::V3) => {
                format!("{}/{parent_id}/Groups", self.endpoints.roles_v3)
            }
        }
    }
}

/// One request that failed during an independent submission.
#[derive(Debug, Clone)]
pub struct FailedRequest {
    pub endpoint: String,
    pub error: TransportError,
}

/// Result of several independent PATCH calls.
///
/// Partial application is an outcome, not an error: calls that succeeded
/// stay applied.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    Applied,
    PartiallyApplied {
        applied: usize,
        failed: Vec<FailedRequest>,
    },
    Failed {
        failed: Vec<FailedRequest>,
    },
}

impl SubmissionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn failures(&self) -> &[FailedRequest] {
        match self {
            Self::Applied => &[],
            Self::PartiallyApplied { failed, .. } | Self::Failed { failed } => failed,
        }
    }
}

/// Sends profile edits and membership deltas through a [`PatchTransport`].
#[derive(Debug)]
pub struct PatchSubmitter<T> {
    transport: T,
    endpoints: RoleEndpoints,
    format: PatchFormatKind,
}

impl<T: PatchTransport> PatchSubmitter<T> {
    pub fn new(transport: T, config: &ConsoleConfig) -> Self {
        Self {
            transport,
            endpoints: RoleEndpoints::from_config(config),
            format: config.patch_format(),
        }
    }

    pub fn endpoints(&self) -> &RoleEndpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send synthesized profile operations as one request.
    ///
    /// Returns `Ok(false)` without calling the transport when there is
    /// nothing to change.
    pub async fn submit_profile(
        &self,
        user_id: &str,
        operations: Vec<PatchOperation>,
    ) -> Result<bool, TransportError> {
        self.send(self.endpoints.user(user_id), PatchRequest::new(operations))
            .await
    }

    /// Send a membership delta as one request in the configured format.
    pub async fn submit_membership(
        &self,
        parent_id: &str,
        target: MembershipTarget,
        delta: &MembershipDelta,
    ) -> Result<bool, TransportError> {
        let operations = self.format.strategy().operations(target, delta);
        let endpoint = self.endpoints.membership(parent_id, target);
        self.send(endpoint, PatchRequest::new(operations)).await
    }

    /// Issue independent requests concurrently.
    ///
    /// Nothing is retried or rolled back.
    pub async fn submit_independent(
        &self,
        requests: Vec<(String, PatchRequest)>,
    ) -> SubmissionOutcome {
        let total = requests.len();
        let results = join_all(requests.iter().map(|(endpoint, request)| async move {
            self.transport
                .patch(endpoint, request)
                .await
                .map_err(|error| FailedRequest {
                    endpoint: endpoint.clone(),
                    error,
                })
        }))
        .await;

        let failed: Vec<FailedRequest> = results.into_iter().filter_map(Result::err).collect();
        let applied = total - failed.len();

        if failed.is_empty() {
            info!("Applied {} independent requests", total);
            SubmissionOutcome::Applied
        } else if applied == 0 {
            warn!("All {} independent requests failed", total);
            SubmissionOutcome::Failed { failed }
        } else {
            warn!(
                "Partially applied independent requests: {} applied, {} failed",
                applied,
                failed.len()
            );
            SubmissionOutcome::PartiallyApplied { applied, failed }
        }
    }

    async fn send(&self, endpoint: String, request: PatchRequest) -> Result<bool, TransportError> {
        if request.is_empty() {
            debug!("Nothing to submit to {}", endpoint);
            return Ok(false);
        }
        debug!("Submitting {} operations to {}", request.len(), endpoint);
        self.transport.patch(&endpoint, &request).await?;
        Ok(true)
    }
}

/// Severity of a user-facing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub description: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            level: AlertLevel::Success,
            description: message.clone(),
            message,
        }
    }

    /// An error alert preferring the backend `description`, then `detail`,
    /// then `generic`.
    pub fn from_transport_error(error: &TransportError, generic: &str) -> Self {
        let description = error
            .description()
            .or_else(|| error.detail())
            .unwrap_or(generic)
            .to_string();
        Self {
            level: AlertLevel::Error,
            message: generic.to_string(),
            description,
        }
    }

    pub fn from_outcome(outcome: &SubmissionOutcome, success: &str, generic: &str) -> Self {
        match outcome {
            SubmissionOutcome::Applied => Self::success(success),
            SubmissionOutcome::PartiallyApplied { applied, failed } => Self {
                level: AlertLevel::Warning,
                message: generic.to_string(),
                description: format!(
                    "{} of {} changes could not be applied",
                    failed.len(),
                    applied + failed.len()
                ),
            },
            SubmissionOutcome::Failed { failed } => match failed.first() {
                Some(first) => Self::from_transport_error(&first.error, generic),
                None => Self {
                    level: AlertLevel::Error,
                    message: generic.to_string(),
                    description: generic.to_string(),
                },
            },
        }
    }
}
