//! Console configuration.
//!
//! Holds the feature flags, backend endpoints and profile settings that the
//! patch, membership and submission layers read. Configuration is immutable once
//! built and is validated before use.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_console::config::ConsoleConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsoleConfig::builder()
//!     .with_server_origin("https://localhost:9443")
//!     .enable_user_roles_v3()
//!     .build()?;
//!
//! assert!(config.features.user_roles_v3);
//! assert_eq!(config.endpoints.roles_v3, "https://localhost:9443/scim2/v3/Roles");
//! # Ok(())
//! # }
//! ```

use crate::error::{ConfigurationError, ConsoleResult};
use crate::membership::PatchFormatKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default namespace for extended profile attributes.
pub const DEFAULT_PROFILE_SCHEMA_URN: &str = "urn:scim:wso2:schema";

/// Complete console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    /// UI feature flags
    pub features: FeatureFlags,
    /// SCIM endpoints the console patches
    pub endpoints: Endpoints,
    /// Profile schema settings
    pub profile: ProfileConfig,
}

impl ConsoleConfig {
    pub fn builder() -> ConsoleConfigBuilder {
        ConsoleConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConsoleResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Validate the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in self.endpoints.named() {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingEndpoint {
                    name: name.to_string(),
                });
            }
        }

        let urn = &self.profile.user_profile_schema;
        if !urn.starts_with("urn:") || urn.ends_with(':') {
            return Err(ConfigurationError::InvalidSchemaUrn { urn: urn.clone() });
        }

        Ok(())
    }

    /// Membership PATCH format selected by the `userRolesV3` flag.
    pub fn patch_format(&self) -> PatchFormatKind {
        PatchFormatKind::from_feature_flag(self.features.user_roles_v3)
    }

    /// Settings the patch synthesizer needs.
    pub fn patch_config(&self) -> PatchConfig {
        PatchConfig {
            default_extension_schema: self.profile.user_profile_schema.clone(),
            normalize_locale: self.profile.normalize_locale,
        }
    }
}

/// Console feature flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    /// Use the V3 roles API with flat path-filter PATCH bodies
    #[serde(rename = "userRolesV3")]
    pub user_roles_v3: bool,
}

/// SCIM endpoint base URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    pub users: String,
    pub groups: String,
    pub roles: String,
    #[serde(rename = "rolesV3")]
    pub roles_v3: String,
}

impl Endpoints {
    /// Endpoints rooted at `origin`, using the standard SCIM2 paths.
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            users: format!("{origin}/scim2/Users"),
            groups: format!("{origin}/scim2/Groups"),
            roles: format!("{origin}/scim2/v2/Roles"),
            roles_v3: format!("{origin}/scim2/v3/Roles"),
        }
    }

    fn named(&self) -> [(&'static str, &str); 4] {
        [
            ("users", &self.users),
            ("groups", &self.groups),
            ("roles", &self.roles),
            ("rolesV3", &self.roles_v3),
        ]
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_origin("")
    }
}

/// Profile schema settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileConfig {
    /// Namespace for extended attributes without an explicit `schemaId`
    pub user_profile_schema: String,
    /// Rewrite `locale` values to `language_REGION` before patching
    pub normalize_locale: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_profile_schema: DEFAULT_PROFILE_SCHEMA_URN.to_string(),
            normalize_locale: true,
        }
    }
}

/// Settings consumed by [`crate::patch::PatchSynthesizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// Namespace for extended attributes without an explicit `schemaId`
    pub default_extension_schema: String,
    /// Rewrite `locale` values to `language_REGION`
    pub normalize_locale: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            default_extension_schema: DEFAULT_PROFILE_SCHEMA_URN.to_string(),
            normalize_locale: true,
        }
    }
}

/// Builder for [`ConsoleConfig`].
#[derive(Debug, Default)]
pub struct ConsoleConfigBuilder {
    config: ConsoleConfig,
}

impl ConsoleConfigBuilder {
    pub fn with_server_origin(mut self, origin: &str) -> Self {
        self.config.endpoints = Endpoints::for_origin(origin);
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn enable_user_roles_v3(mut self) -> Self {
        self.config.features.user_roles_v3 = true;
        self
    }

    pub fn with_user_profile_schema(mut self, urn: impl Into<String>) -> Self {
        self.config.profile.user_profile_schema = urn.into();
        self
    }

    pub fn build(self) -> Result<ConsoleConfig, ConfigurationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
