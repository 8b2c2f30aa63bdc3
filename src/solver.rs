// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS-01 challenge orchestration.
//!
//! [`BlueCatSolver`] implements the two operations cert-manager invokes on a
//! DNS-01 webhook solver:
//!
//! - **Present** - publish the challenge token as a TXT record
//! - **CleanUp** - remove that TXT record after validation
//!
//! Both operations are stateless and idempotent. Every invocation decodes the
//! issuer config, resolves the password secret, opens a BlueCat session and
//! reconciles the record set against the desired state using exact
//! (name, token) matching. A failed Present may leave a record behind; the
//! next Present or CleanUp converges.
//!
//! # Example
//!
//! ```rust,no_run
//! use bluecat_webhook::call_context::CallContext;
//! use bluecat_webhook::secrets::StaticSecretResolver;
//! use bluecat_webhook::solver::{BlueCatSolver, ChallengeRequest};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> bluecat_webhook::errors::Result<()> {
//! let solver = BlueCatSolver::new(Arc::new(StaticSecretResolver::new().with_fallback("s3cret")));
//! let request = ChallengeRequest {
//!     resolved_fqdn: "_acme-challenge.example.com.".into(),
//!     key: "token".into(),
//!     config: Some(json!({
//!         "apiHost": "bam.example.internal",
//!         "zone": "example.com",
//!         "username": "cert-manager",
//!         "passwordSecretRef": { "name": "bluecat-auth", "key": "password" }
//!     })),
//!     ..Default::default()
//! };
//!
//! solver.present(&CallContext::background(), &request).await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::bluecat::BlueCatClient;
use crate::call_context::CallContext;
use crate::config::{decode_config, is_quick_deploy_enabled, validate_config, ProviderConfig};
use crate::constants::{DEFAULT_NAMESPACE, SOLVER_NAME};
use crate::errors::{BlueCatError, Result};
use crate::metrics::record_challenge;
use crate::names::{is_within_zone, to_relative_name, trim_trailing_dot};
use crate::records::find_txt_record_matches;
use crate::secrets::SecretResolver;

/// The subset of a cert-manager `ChallengeRequest` the solver consumes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Unique ID of the challenge, used only for log correlation
    #[serde(default)]
    pub uid: String,

    /// FQDN the TXT record must be published at (e.g., `_acme-challenge.example.com.`)
    #[serde(rename = "resolvedFQDN", alias = "resolvedFqdn")]
    pub resolved_fqdn: String,

    /// Zone cert-manager discovered for the FQDN; informational only
    #[serde(default)]
    pub resolved_zone: String,

    /// Challenge token to publish
    pub key: String,

    /// Namespace the password secret is read from
    #[serde(default)]
    pub resource_namespace: String,

    /// Raw solver config from the issuer
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    fn namespace(&self) -> &str {
        if self.resource_namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.resource_namespace
        }
    }
}

/// Result of a Present or CleanUp invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChallengeOutcome {
    /// BlueCat zone the record lives in
    pub zone_id: i64,
    /// Number of records created (Present) or deleted (CleanUp)
    pub changed: usize,
    /// Whether a quick deployment was triggered
    pub deployed: bool,
}

/// Everything an operation needs once config and credentials are resolved.
struct PreparedChallenge {
    config: ProviderConfig,
    client: BlueCatClient,
    zone_id: i64,
    fqdn: String,
    relative_name: String,
}

/// cert-manager DNS-01 solver backed by BlueCat Address Manager.
#[derive(Clone)]
pub struct BlueCatSolver {
    secrets: Arc<dyn SecretResolver>,
}

impl BlueCatSolver {
    /// Create a solver that reads passwords through `secrets`.
    #[must_use]
    pub fn new(secrets: Arc<dyn SecretResolver>) -> Self {
        Self { secrets }
    }

    /// Solver name cert-manager routes challenges by.
    #[must_use]
    pub fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    /// Publish the challenge token as a TXT record.
    ///
    /// An identical existing record is reused instead of recreated. A quick
    /// deployment follows in both cases unless disabled in the config, so a
    /// retry after a failed deployment still pushes the record live.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; nothing is rolled back.
    pub async fn present(
        &self,
        ctx: &CallContext,
        request: &ChallengeRequest,
    ) -> Result<ChallengeOutcome> {
        observe_challenge("present", async {
            let prepared = self.prepare(ctx, request).await?;
            let PreparedChallenge {
                config,
                client,
                zone_id,
                fqdn,
                relative_name,
            } = &prepared;

            let existing = client.list_txt_records(ctx, *zone_id, fqdn).await?;
            let matches = find_txt_record_matches(&existing, fqdn, relative_name, &request.key);

            let mut outcome = ChallengeOutcome {
                zone_id: *zone_id,
                ..Default::default()
            };

            if let Some(record) = matches.first() {
                info!(
                    uid = %request.uid,
                    fqdn = %fqdn,
                    record_id = record.id,
                    "Challenge TXT record already present"
                );
            } else {
                client
                    .create_txt_record(ctx, *zone_id, relative_name, &request.key, config.ttl)
                    .await?;
                outcome.changed = 1;
            }

            // Deploy existing records too: an earlier attempt may have created
            // the record and failed before deploying it
            if is_quick_deploy_enabled(config) {
                client.trigger_quick_deploy(ctx, *zone_id).await?;
                outcome.deployed = true;
            }

            info!(
                uid = %request.uid,
                fqdn = %fqdn,
                zone_id = zone_id,
                created = outcome.changed,
                deployed = outcome.deployed,
                "Presented challenge TXT record"
            );
            Ok(outcome)
        })
        .await
    }

    /// Remove the challenge TXT record.
    ///
    /// Deletes every record matching the FQDN and token; records holding
    /// other tokens are left alone. A quick deployment follows any deletion
    /// unless disabled in the config.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step.
    pub async fn cleanup(
        &self,
        ctx: &CallContext,
        request: &ChallengeRequest,
    ) -> Result<ChallengeOutcome> {
        observe_challenge("cleanup", async {
            let prepared = self.prepare(ctx, request).await?;
            let PreparedChallenge {
                config,
                client,
                zone_id,
                fqdn,
                relative_name,
            } = &prepared;

            let existing = client.list_txt_records(ctx, *zone_id, fqdn).await?;
            let matches = find_txt_record_matches(&existing, fqdn, relative_name, &request.key);

            let mut outcome = ChallengeOutcome {
                zone_id: *zone_id,
                ..Default::default()
            };

            for record in &matches {
                client.delete_txt_record(ctx, record.id).await?;
                outcome.changed += 1;
            }

            if outcome.changed > 0 && is_quick_deploy_enabled(config) {
                client.trigger_quick_deploy(ctx, *zone_id).await?;
                outcome.deployed = true;
            }

            info!(
                uid = %request.uid,
                fqdn = %fqdn,
                zone_id = zone_id,
                deleted = outcome.changed,
                deployed = outcome.deployed,
                "Cleaned up challenge TXT records"
            );
            Ok(outcome)
        })
        .await
    }

    async fn prepare(
        &self,
        ctx: &CallContext,
        request: &ChallengeRequest,
    ) -> Result<PreparedChallenge> {
        let config = decode_config(request.config.as_ref())?;
        validate_config(&config)?;

        let fqdn = trim_trailing_dot(request.resolved_fqdn.trim()).to_string();
        if fqdn.is_empty() {
            return Err(BlueCatError::validation("challenge FQDN is required"));
        }
        if request.key.is_empty() {
            return Err(BlueCatError::validation("challenge key is required"));
        }
        if !is_within_zone(&fqdn, &config.zone) {
            return Err(BlueCatError::config(
                "zone",
                format!("'{fqdn}' is not within zone '{}'", config.zone),
            ));
        }
        let relative_name = to_relative_name(&fqdn, &config.zone);

        let base_url = config.api_base_url()?;
        let namespace = request.namespace();
        let password_ref = config
            .password_secret_ref
            .as_ref()
            .ok_or_else(|| BlueCatError::config("passwordSecretRef", "is required"))?;
        let password = ctx
            .run(self.secrets.resolve(namespace, password_ref))
            .await?;

        debug!(
            uid = %request.uid,
            fqdn = %fqdn,
            resolved_zone = %request.resolved_zone,
            zone = %config.zone,
            relative_name = %relative_name,
            base_url = %base_url,
            "Preparing BlueCat challenge"
        );

        let http = BlueCatClient::build_http_client(
            config.insecure_skip_tls_verify,
            config.request_timeout(),
        )?;
        let client = BlueCatClient::login(ctx, &base_url, http, &config.username, &password).await?;
        let zone_id = client.resolve_zone(ctx, &config.zone).await?;

        Ok(PreparedChallenge {
            config,
            client,
            zone_id,
            fqdn,
            relative_name,
        })
    }
}

/// Time a challenge operation and record its outcome.
async fn observe_challenge<F>(action: &str, fut: F) -> Result<ChallengeOutcome>
where
    F: Future<Output = Result<ChallengeOutcome>>,
{
    let start = Instant::now();
    let result = fut.await;
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.reason(),
    };
    record_challenge(action, outcome, start.elapsed());
    result
}
