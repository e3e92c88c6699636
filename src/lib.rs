//! SCIM 2.0 admin console core for Rust.
//!
//! Turns user-profile form edits into minimal SCIM2 PATCH requests,
//! reconciles role and group memberships into add/remove operations for
//! either the V2 or V3 role API, and resolves pluggable UI extensions lazily.
//!
//! # Core Components
//!
//! - [`ProfileSchema`] - Compiled attribute schemas with precomputed shapes
//! - [`PatchSynthesizer`] - Profile edits to PATCH operations
//! - [`membership::reconcile`] - Membership deltas, serialised by a [`PatchFormat`]
//! - [`ExtensionRegistry`] - Lazy, memoised UI extension resolution
//! - [`PatchSubmitter`] - Submission through a pluggable [`PatchTransport`]
//!
//! # Quick Start
//!
//! ```rust
//! use scim_console::{ConsoleConfig, PatchSynthesizer, PendingValueSet, ProfileSchema};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::builder()
//!     .with_server_origin("https://localhost:9443")
//!     .build()?;
//! let patch_config = config.patch_config();
//! let schema = ProfileSchema::with_embedded_user_profile()?;
//!
//! let proposed = PendingValueSet::new().with("nickName", "jd");
//! let request = PatchSynthesizer::new(&schema, &patch_config)
//!     .synthesize_request(&json!({}), &proposed);
//! assert_eq!(request.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod extensions;
pub mod membership;
pub mod patch;
pub mod schema;
pub mod submit;

// Re-export commonly used types for convenience
pub use config::{ConsoleConfig, ConsoleConfigBuilder, Endpoints, PatchConfig};
pub use error::{
    ConfigurationError, ConsoleError, ConsoleResult, ExtensionError, LoadError, SchemaError,
    TransportError,
};
pub use extensions::{
    ExtensionDescriptor, ExtensionRegistry, ExtensionType, ExtensionsConfig, LoadableRef,
    ModuleLoader, Resolution, ResolutionState,
};
pub use membership::{EntityRef, MembershipDelta, MembershipTarget, PatchFormat, PatchFormatKind};
pub use patch::{
    PatchOp, PatchOperation, PatchRequest, PatchSynthesizer, PendingValueSet, ProposedValue,
};
pub use schema::{AttributeSchema, AttributeShape, ProfileSchema};
pub use submit::{Alert, AlertLevel, PatchSubmitter, PatchTransport, SubmissionOutcome};
