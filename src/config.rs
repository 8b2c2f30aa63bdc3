// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider configuration for the BlueCat solver.
//!
//! cert-manager hands every challenge an opaque JSON blob taken from the
//! `Issuer`'s `webhook.config` field. This module decodes that blob into a
//! [`ProviderConfig`] and enforces the invariants the solver relies on.
//!
//! # Example
//!
//! ```rust
//! use bluecat_webhook::config::{decode_config, is_quick_deploy_enabled, validate_config};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "apiHost": "bam.example.internal",
//!     "zone": "example.com.",
//!     "username": "cert-manager",
//!     "passwordSecretRef": { "name": "bluecat-auth", "key": "password" },
//! });
//!
//! let cfg = decode_config(Some(&raw)).unwrap();
//! validate_config(&cfg).unwrap();
//! assert!(is_quick_deploy_enabled(&cfg));
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::errors::{BlueCatError, Result};
use crate::names::resolve_api_base_url;

/// Reference to a key inside a Kubernetes Secret.
///
/// The secret is looked up in the namespace of the challenge's issuer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SecretKeySelector {
    /// Name of the Secret
    #[serde(default)]
    pub name: String,

    /// Key within the Secret's data
    #[serde(default)]
    pub key: String,
}

impl SecretKeySelector {
    /// Create a selector for `key` in the secret `name`.
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// BlueCat solver configuration carried in the issuer's webhook config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// BlueCat Address Manager host, either a bare host name or a URL.
    ///
    /// Examples: `bam.example.internal`, `https://bam.example.internal/api/v2`
    #[serde(default)]
    pub api_host: String,

    /// Optional API path override. Defaults to the host's path or `/api/v2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,

    /// Authoritative zone the challenge records are created in (trailing dot optional).
    #[serde(default)]
    pub zone: String,

    /// BlueCat user the solver logs in as.
    #[serde(default)]
    pub username: String,

    /// Secret holding the password for `username`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_secret_ref: Option<SecretKeySelector>,

    /// Skip TLS certificate verification when talking to BlueCat.
    #[serde(
        default,
        rename = "insecureSkipTLSVerify",
        alias = "insecureSkipTlsVerify"
    )]
    pub insecure_skip_tls_verify: bool,

    /// Trigger a quick deployment after changing records. Unset means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_deploy: Option<bool>,

    /// TTL in seconds for created TXT records. Unset uses the zone default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub ttl: Option<u32>,

    /// Per-request HTTP timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Absolute BlueCat API root derived from `apiHost` and `apiPath`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Url`] if the host is empty or malformed.
    pub fn api_base_url(&self) -> Result<String> {
        resolve_api_base_url(&self.api_host, self.api_path.as_deref().unwrap_or_default())
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }
}

/// Validate the presence and shape of required configuration fields.
///
/// Missing `apiPath` and `quickDeploy` are accepted since both have defaults.
///
/// # Errors
///
/// Returns [`BlueCatError::Config`] naming the first offending field.
pub fn validate_config(cfg: &ProviderConfig) -> Result<()> {
    if cfg.api_host.trim().is_empty() {
        return Err(BlueCatError::config("apiHost", "must not be empty"));
    }
    if cfg.zone.trim().trim_end_matches('.').is_empty() {
        return Err(BlueCatError::config("zone", "must not be empty"));
    }
    if cfg.username.trim().is_empty() {
        return Err(BlueCatError::config("username", "must not be empty"));
    }

    let secret_ref = cfg
        .password_secret_ref
        .as_ref()
        .ok_or_else(|| BlueCatError::config("passwordSecretRef", "is required"))?;
    if secret_ref.name.trim().is_empty() {
        return Err(BlueCatError::config(
            "passwordSecretRef.name",
            "must not be empty",
        ));
    }
    if secret_ref.key.trim().is_empty() {
        return Err(BlueCatError::config(
            "passwordSecretRef.key",
            "must not be empty",
        ));
    }

    if cfg.ttl == Some(0) {
        return Err(BlueCatError::config("ttl", "must be greater than zero"));
    }
    if cfg.timeout_seconds == Some(0) {
        return Err(BlueCatError::config(
            "timeoutSeconds",
            "must be greater than zero",
        ));
    }

    Ok(())
}

/// Whether changes should be pushed with a quick deployment.
///
/// Quick deploy is enabled unless explicitly set to `false`.
#[must_use]
pub fn is_quick_deploy_enabled(cfg: &ProviderConfig) -> bool {
    cfg.quick_deploy.unwrap_or(true)
}

/// Decode the webhook config payload of a challenge request.
///
/// # Errors
///
/// Returns [`BlueCatError::Config`] when the payload is absent, `null`, or
/// does not match [`ProviderConfig`].
pub fn decode_config(raw: Option<&serde_json::Value>) -> Result<ProviderConfig> {
    let raw = match raw {
        None | Some(serde_json::Value::Null) => {
            return Err(BlueCatError::config("config", "webhook config is missing"));
        }
        Some(raw) => raw,
    };
    ProviderConfig::deserialize(raw)
        .map_err(|e| BlueCatError::config("config", format!("failed to decode: {e}")))
}

/// Load a [`ProviderConfig`] from a YAML or JSON file.
///
/// # Errors
///
/// Returns [`BlueCatError::Config`] if the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<ProviderConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        BlueCatError::config("config", format!("failed to read {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&contents).map_err(|e| {
        BlueCatError::config("config", format!("failed to parse {}: {e}", path.display()))
    })
}

/// JSON schema of [`ProviderConfig`], for documenting issuer configuration.
#[must_use]
pub fn config_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(ProviderConfig)).unwrap_or_default()
}
