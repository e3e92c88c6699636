//! Error types for console patch and extension operations.
//!
//! Synthesis and reconciliation are pure and have no error paths. Errors arise
//! only while loading schemas and configuration, registering extensions, and
//! submitting PATCH requests to the backend.

use serde_json::Value;

/// Main error type for console operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Profile schema could not be loaded or compiled
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Extension registry misuse
    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    /// Console configuration is invalid
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// PATCH submission failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors while reading schemas or configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while compiling a profile schema set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two entries share the same dotted name
    #[error("Duplicate attribute '{name}' in profile schema")]
    DuplicateAttribute { name: String },

    /// Attribute name or one of its segments is empty
    #[error("Attribute name '{name}' is empty or has an empty segment")]
    EmptyAttributeName { name: String },

    /// Attribute path nests deeper than `parent.child`
    #[error("Attribute '{name}' has {segments} segments, at most 2 are supported")]
    TooManySegments { name: String, segments: usize },
}

/// Errors raised by the extension registry outside of module resolution.
///
/// Resolution failures are never surfaced through this type; they are
/// reported as [`crate::extensions::ResolutionFailure`] fallbacks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtensionError {
    /// `register` was called a second time
    #[error("Extensions configuration is already registered")]
    AlreadyRegistered,

    /// A template extension entry has no string `id`
    #[error("Template extension in '{collection}' is missing a string 'id'")]
    MissingTemplateId { collection: String },
}

/// Errors produced by a module loader while fetching a fragment.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    /// The resource path does not exist
    #[error("Module not found: {path}")]
    NotFound { path: String },

    /// The resource exists but could not be parsed
    #[error("Module '{path}' is malformed: {message}")]
    Malformed { path: String, message: String },

    /// The resource path escapes the loader's base directory
    #[error("Module path '{path}' is outside the loader root")]
    OutsideRoot { path: String },

    /// Loader-specific failure
    #[error("Module '{path}' failed to load: {message}")]
    Other { path: String, message: String },
}

/// Errors raised by console configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A required endpoint is empty
    #[error("Endpoint '{name}' must not be empty")]
    MissingEndpoint { name: String },

    /// The default profile extension URN is malformed
    #[error("Invalid profile schema URN: {urn}")]
    InvalidSchemaUrn { urn: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// A failed PATCH call.
///
/// Carries the HTTP status and the response body when the backend answered,
/// so callers can surface the backend's own `description` or `detail`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Backend answered with a non-2xx status
    #[error("Request to '{endpoint}' failed with status {status}")]
    Status {
        endpoint: String,
        status: u16,
        body: Option<Value>,
    },

    /// The request never reached the backend
    #[error("Network error for '{endpoint}': {message}")]
    Network { endpoint: String, message: String },
}

impl TransportError {
    /// Create a status error with a response body.
    pub fn status(endpoint: impl Into<String>, status: u16, body: Option<Value>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            body,
        }
    }

    /// Create a network error.
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// The endpoint the failed request targeted.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Status { endpoint, .. } | Self::Network { endpoint, .. } => endpoint,
        }
    }

    /// The backend's `description` field, if the response carried one.
    pub fn description(&self) -> Option<&str> {
        self.body_field("description")
    }

    /// The backend's `detail` field, if the response carried one.
    pub fn detail(&self) -> Option<&str> {
        self.body_field("detail")
    }

    fn body_field(&self, field: &str) -> Option<&str> {
        match self {
            Self::Status {
                body: Some(body), ..
            } => body
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

/// Result type alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
