// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Password secret resolution.
//!
//! The provider config only names the Secret holding the BlueCat password.
//! A [`SecretResolver`] turns that reference into the password value. In a
//! cluster this is [`KubeSecretResolver`]; [`StaticSecretResolver`] serves
//! the CLI and tests.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::HashMap;
use tracing::debug;

use crate::config::SecretKeySelector;
use crate::errors::{BlueCatError, Result};

/// Resolves a [`SecretKeySelector`] to its string value.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Read `selector.key` from the Secret `selector.name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Secret`] when the secret or key is missing or
    /// the value is not valid UTF-8.
    async fn resolve(&self, namespace: &str, selector: &SecretKeySelector) -> Result<String>;
}

fn secret_error(
    namespace: &str,
    selector: &SecretKeySelector,
    reason: impl Into<String>,
) -> BlueCatError {
    BlueCatError::Secret {
        namespace: namespace.to_string(),
        name: selector.name.clone(),
        key: selector.key.clone(),
        reason: reason.into(),
    }
}

/// Convert raw secret bytes into a password.
///
/// Trailing newlines, common when secrets are created from files, are dropped.
pub(crate) fn decode_secret_value(
    namespace: &str,
    selector: &SecretKeySelector,
    bytes: &[u8],
) -> Result<String> {
    let value = std::str::from_utf8(bytes)
        .map_err(|e| secret_error(namespace, selector, format!("value is not UTF-8: {e}")))?;
    let value = value.trim_end_matches(['\r', '\n']);
    if value.is_empty() {
        return Err(secret_error(namespace, selector, "value is empty"));
    }
    Ok(value.to_string())
}

/// Reads secrets from the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretResolver {
    client: Client,
}

impl KubeSecretResolver {
    /// Create a resolver backed by `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretResolver for KubeSecretResolver {
    async fn resolve(&self, namespace: &str, selector: &SecretKeySelector) -> Result<String> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = match secret_api.get(&selector.name).await {
            Ok(secret) => secret,
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                return Err(secret_error(namespace, selector, "secret not found"));
            }
            Err(e) => {
                return Err(secret_error(namespace, selector, e.to_string()));
            }
        };

        let bytes = secret
            .data
            .as_ref()
            .and_then(|data| data.get(&selector.key))
            .map(|value| value.0.clone())
            .or_else(|| {
                secret
                    .string_data
                    .as_ref()
                    .and_then(|data| data.get(&selector.key))
                    .map(|value| value.as_bytes().to_vec())
            })
            .ok_or_else(|| secret_error(namespace, selector, "key not present in secret"))?;

        debug!(
            namespace = %namespace,
            secret = %selector.name,
            key = %selector.key,
            "Resolved BlueCat password secret"
        );

        decode_secret_value(namespace, selector, &bytes)
    }
}

/// In-memory secrets keyed by `(namespace, name, key)`.
///
/// A value registered with [`StaticSecretResolver::with_fallback`] answers
/// every lookup that has no exact entry.
#[derive(Clone, Debug, Default)]
pub struct StaticSecretResolver {
    values: HashMap<(String, String, String), String>,
    fallback: Option<String>,
}

impl StaticSecretResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` for `key` of secret `name` in `namespace`.
    #[must_use]
    pub fn with_secret(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.values
            .insert((namespace.into(), name.into(), key.into()), value.into());
        self
    }

    /// Answer every unmatched lookup with `value`.
    #[must_use]
    pub fn with_fallback(mut self, value: impl Into<String>) -> Self {
        self.fallback = Some(value.into());
        self
    }
}

#[async_trait]
impl SecretResolver for StaticSecretResolver {
    async fn resolve(&self, namespace: &str, selector: &SecretKeySelector) -> Result<String> {
        let lookup = (
            namespace.to_string(),
            selector.name.clone(),
            selector.key.clone(),
        );
        let value = self
            .values
            .get(&lookup)
            .or(self.fallback.as_ref())
            .ok_or_else(|| secret_error(namespace, selector, "secret not found"))?;
        decode_secret_value(namespace, selector, value.as_bytes())
    }
}
