// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone operations against the BlueCat v2 API.
//!
//! This module contains zone lookup and the quick deployment trigger.

use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use super::types::{Collection, DeploymentRequest, Zone};
use super::{filter_literal, BlueCatClient};
use crate::call_context::CallContext;
use crate::constants::{
    FORCE_ZONE_RETRANSFER_HEADER, QUICK_DEPLOYMENT_TYPE, ZONE_TYPE,
};
use crate::errors::{BlueCatError, Result};
use crate::http_errors::map_http_status;
use crate::names::trim_trailing_dot;

/// Look up a zone ID by absolute name.
///
/// Issues `GET /zones?filter=absoluteName:eq('<zone>')` and picks the first
/// returned zone whose absolute name equals `zone_name` (trailing dot
/// trimmed, ASCII case-insensitive).
///
/// # Errors
///
/// Returns [`BlueCatError::NotFound`] if no zone matches, or the classified
/// HTTP/transport error.
pub async fn resolve_zone(
    client: &BlueCatClient,
    ctx: &CallContext,
    zone_name: &str,
) -> Result<i64> {
    let zone_name = filter_literal("zone name", trim_trailing_dot(zone_name.trim()))?;
    if zone_name.is_empty() {
        return Err(BlueCatError::validation("zone name is required"));
    }

    let mut url = client.endpoint("zones")?;
    url.query_pairs_mut()
        .append_pair("filter", &format!("absoluteName:eq('{zone_name}')"));

    let response = client.send(ctx, Method::GET, &url, None::<&()>, &[]).await?;
    if response.status == StatusCode::NOT_FOUND {
        return Err(zone_not_found(zone_name));
    }
    let zones: Collection<Zone> = response.into_json()?;

    let zone = zones
        .data
        .iter()
        .filter(|zone| zone.zone_type.is_empty() || zone.zone_type == ZONE_TYPE)
        .find(|zone| trim_trailing_dot(&zone.absolute_name).eq_ignore_ascii_case(zone_name))
        .ok_or_else(|| zone_not_found(zone_name))?;

    if zone.id <= 0 {
        return Err(BlueCatError::InvalidResponse {
            url: url.to_string(),
            reason: format!("zone '{zone_name}' has invalid ID {}", zone.id),
        });
    }

    debug!(
        zone = %zone_name,
        zone_id = zone.id,
        candidates = zones.data.len(),
        "Resolved BlueCat zone"
    );

    Ok(zone.id)
}

fn zone_not_found(zone_name: &str) -> BlueCatError {
    BlueCatError::NotFound {
        resource: "zone".to_string(),
        name: zone_name.to_string(),
    }
}

/// Trigger a quick deployment of a zone.
///
/// Issues `POST /zones/{zone_id}/deployments` with body
/// `{"type":"QuickDeployment"}` and `x-bcn-force-zone-retransfer: false`.
/// BlueCat answers `202 Accepted` with no meaningful body.
///
/// # Errors
///
/// Returns [`BlueCatError::Validation`] without any network call when
/// `zone_id` is zero or negative. Any status other than 202 is returned as a
/// classified error carrying the status code and response body.
pub async fn trigger_quick_deploy(
    client: &BlueCatClient,
    ctx: &CallContext,
    zone_id: i64,
) -> Result<()> {
    if zone_id <= 0 {
        return Err(BlueCatError::validation(format!(
            "zone ID is required for quick deployment (got {zone_id})"
        )));
    }

    let url = client.endpoint(&format!("zones/{zone_id}/deployments"))?;
    let body = DeploymentRequest {
        deployment_type: QUICK_DEPLOYMENT_TYPE,
    };

    let response = client
        .send(
            ctx,
            Method::POST,
            &url,
            Some(&body),
            &[(FORCE_ZONE_RETRANSFER_HEADER, "false")],
        )
        .await?;

    if response.status != StatusCode::ACCEPTED {
        return Err(map_http_status(
            &response.url,
            response.status.as_u16(),
            response.body,
        ));
    }

    info!(zone_id = zone_id, "Triggered BlueCat quick deployment");
    Ok(())
}
