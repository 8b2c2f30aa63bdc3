// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! BlueCat Address Manager client.
//!
//! This module provides an authenticated client for the BlueCat v2 REST API.
//! It handles:
//!
//! - Session login and credential normalization
//! - Zone lookup by name
//! - TXT record search, creation and deletion
//! - Quick deployment of zone changes to live DNS servers
//!
//! # Architecture
//!
//! [`BlueCatClient`] holds an immutable base URL, a reqwest client and the
//! `Authorization` header value. It is cheap to clone and safe to share
//! between concurrent challenges. Every operation takes a [`CallContext`]
//! and performs a single request (or a short, bounded sequence for paged
//! searches) without retrying; retry policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use bluecat_webhook::bluecat::BlueCatClient;
//! use bluecat_webhook::call_context::CallContext;
//! use std::time::Duration;
//!
//! # async fn example() -> bluecat_webhook::errors::Result<()> {
//! let ctx = CallContext::background();
//! let http = BlueCatClient::build_http_client(false, Duration::from_secs(30))?;
//! let client = BlueCatClient::login(
//!     &ctx,
//!     "https://bam.example.internal/api/v2",
//!     http,
//!     "cert-manager",
//!     "secret",
//! )
//! .await?;
//!
//! let zone_id = client.resolve_zone(&ctx, "example.com.").await?;
//! client.trigger_quick_deploy(&ctx, zone_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod record_ops;
pub(crate) mod request;
pub mod types;
pub mod zone_ops;

pub use types::{Collection, Session, Zone};

use reqwest::{Client as HttpClient, Method};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

use crate::call_context::CallContext;
use crate::constants::BASIC_AUTH_SCHEME;
use crate::errors::{BlueCatError, Result};
use crate::metrics::record_api_request;
use crate::names::normalize_basic_credential;
use crate::records::ResourceRecord;
use request::send_request;
use types::SessionRequest;

/// Authenticated client for the BlueCat v2 REST API.
///
/// # Examples
///
/// ```rust
/// use bluecat_webhook::bluecat::BlueCatClient;
///
/// let client = BlueCatClient::new(
///     "https://bam.example.internal/api/v2/",
///     reqwest::Client::new(),
///     "Bearer token",
/// );
/// assert_eq!(client.base_url(), "https://bam.example.internal/api/v2");
/// ```
#[derive(Debug, Clone)]
pub struct BlueCatClient {
    /// Absolute API root without a trailing slash
    base_url: Arc<String>,
    /// HTTP client for API requests
    http: Arc<HttpClient>,
    /// Value of the `Authorization` header
    auth_header: Arc<String>,
}

impl BlueCatClient {
    /// Create a client from an API root, transport and authorization value.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        http: HttpClient,
        auth_header: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url: Arc::new(base_url),
            http: Arc::new(http),
            auth_header: Arc::new(auth_header.into()),
        }
    }

    /// Create a client that authenticates with a basic credential.
    ///
    /// `credential` may be raw `user:pass` or already base64-encoded.
    #[must_use]
    pub fn with_basic_credential(
        base_url: impl Into<String>,
        http: HttpClient,
        credential: &str,
    ) -> Self {
        let header = format!(
            "{BASIC_AUTH_SCHEME} {}",
            normalize_basic_credential(credential)
        );
        Self::new(base_url, http, header)
    }

    /// Build the reqwest transport used for BlueCat calls.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Config`] if the TLS backend cannot be initialized.
    pub fn build_http_client(
        insecure_skip_tls_verify: bool,
        timeout: Duration,
    ) -> Result<HttpClient> {
        HttpClient::builder()
            .danger_accept_invalid_certs(insecure_skip_tls_verify)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BlueCatError::config(
                    "insecureSkipTLSVerify",
                    format!("failed to build HTTP client: {e}"),
                )
            })
    }

    /// Open a session and return a client authenticated with it.
    ///
    /// Posts the credentials to `/sessions` and uses the returned
    /// `basicAuthenticationCredentials` (or `username:apiToken`) as the
    /// `Basic` credential for all subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Auth`] when BlueCat rejects the credentials,
    /// [`BlueCatError::InvalidResponse`] when the session carries no
    /// credential, and the usual transport classifications otherwise.
    pub async fn login(
        ctx: &CallContext,
        base_url: &str,
        http: HttpClient,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        if username.is_empty() {
            return Err(BlueCatError::validation("username is required to log in"));
        }

        let anonymous = Self::new(base_url, http.clone(), "");
        let url = anonymous.endpoint("sessions")?;
        let body = SessionRequest { username, password };

        let session: Session = observe("login", async {
            anonymous
                .send(ctx, Method::POST, &url, Some(&body), &[])
                .await?
                .into_json()
        })
        .await?;

        let credential = match (
            session.basic_authentication_credentials.as_deref(),
            session.api_token.as_deref(),
        ) {
            (Some(credential), _) if !credential.is_empty() => credential.to_string(),
            (_, Some(token)) if !token.is_empty() => format!("{username}:{token}"),
            _ => {
                return Err(BlueCatError::InvalidResponse {
                    url: url.to_string(),
                    reason: "session response carries no credentials".to_string(),
                })
            }
        };

        info!(username = %username, base_url = %anonymous.base_url, "Opened BlueCat API session");

        Ok(Self::with_basic_credential(base_url, http, &credential))
    }

    /// Absolute API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the API root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| BlueCatError::Url {
            input: raw,
            reason: e.to_string(),
        })
    }

    /// Resolve a link `href` returned by the API against the API host.
    pub(crate) fn resolve_href(&self, href: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| BlueCatError::Url {
            input: self.base_url.to_string(),
            reason: e.to_string(),
        })?;
        base.join(href).map_err(|e| BlueCatError::Url {
            input: href.to_string(),
            reason: e.to_string(),
        })
    }

    /// Send a request with this client's transport and credentials.
    pub(crate) async fn send<B: serde::Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: Method,
        url: &Url,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<request::ApiResponse> {
        send_request(ctx, &self.http, &self.auth_header, method, url, body, headers).await
    }

    // ===== Zone methods =====

    /// Look up the ID of the zone named `zone_name`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::NotFound`] if no zone matches,
    /// [`BlueCatError::Auth`] on 401/403 and [`BlueCatError::Transient`] on
    /// 5xx or network failures.
    pub async fn resolve_zone(&self, ctx: &CallContext, zone_name: &str) -> Result<i64> {
        observe("resolve_zone", zone_ops::resolve_zone(self, ctx, zone_name)).await
    }

    /// Push pending changes of `zone_id` to the DNS servers.
    ///
    /// # Errors
    ///
    /// Returns [`BlueCatError::Validation`] without any network call when
    /// `zone_id` is not positive; any status other than 202 is an error.
    pub async fn trigger_quick_deploy(&self, ctx: &CallContext, zone_id: i64) -> Result<()> {
        observe("quick_deploy", zone_ops::trigger_quick_deploy(self, ctx, zone_id)).await
    }

    // ===== Record methods =====

    /// List the TXT records at `fqdn` in zone `zone_id`, following pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or cannot be decoded.
    pub async fn list_txt_records(
        &self,
        ctx: &CallContext,
        zone_id: i64,
        fqdn: &str,
    ) -> Result<Vec<ResourceRecord>> {
        observe(
            "list_txt_records",
            record_ops::list_txt_records(self, ctx, zone_id, fqdn),
        )
        .await
    }

    /// Create a TXT record holding `token` at `relative_name`.
    ///
    /// A conflict with an identical existing record counts as success.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be created.
    pub async fn create_txt_record(
        &self,
        ctx: &CallContext,
        zone_id: i64,
        relative_name: &str,
        token: &str,
        ttl: Option<u32>,
    ) -> Result<()> {
        observe(
            "create_txt_record",
            record_ops::create_txt_record(self, ctx, zone_id, relative_name, token, ttl),
        )
        .await
    }

    /// Delete the record with ID `record_id`; a missing record is success.
    ///
    /// # Errors
    ///
    /// Returns an error if BlueCat refuses the deletion.
    pub async fn delete_txt_record(&self, ctx: &CallContext, record_id: i64) -> Result<()> {
        observe(
            "delete_txt_record",
            record_ops::delete_txt_record(self, ctx, record_id),
        )
        .await
    }
}

/// Check that `value` can be embedded in a `'...'` filter literal.
///
/// BlueCat filter expressions have no escape for `'`, and no valid DNS name
/// contains one, so such values are rejected.
pub(crate) fn filter_literal<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    if value.contains('\'') {
        return Err(BlueCatError::validation(format!(
            "{what} '{value}' must not contain a single quote"
        )));
    }
    Ok(value)
}

/// Time `fut` and record its outcome under `operation`.
async fn observe<T, F>(operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = fut.await;
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.reason(),
    };
    record_api_request(operation, outcome, start.elapsed());
    result
}
