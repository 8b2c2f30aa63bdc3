// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TXT record operations against the BlueCat v2 API.

use reqwest::{Method, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::types::{Collection, CreateTxtRecordRequest};
use super::{filter_literal, BlueCatClient};
use crate::call_context::CallContext;
use crate::constants::{TXT_RECORD_TYPE, ZONE_APEX};
use crate::errors::{BlueCatError, Result};
use crate::http_errors::map_http_status;
use crate::names::trim_trailing_dot;
use crate::records::{quote_txt, ResourceRecord};

/// Upper bound on pages fetched by a single search
const MAX_SEARCH_PAGES: usize = 100;

fn require_positive(what: &str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(BlueCatError::validation(format!(
            "{what} must be positive (got {id})"
        )));
    }
    Ok(())
}

/// Record name BlueCat expects for a zone-relative name.
///
/// The apex is addressed with an empty name.
fn api_record_name(relative_name: &str) -> &str {
    if relative_name == ZONE_APEX {
        ""
    } else {
        relative_name
    }
}

/// Fetch every page of a resource record search.
async fn search_records(
    client: &BlueCatClient,
    ctx: &CallContext,
    zone_id: i64,
    filter: &str,
) -> Result<Vec<ResourceRecord>> {
    let mut url = client.endpoint(&format!("zones/{zone_id}/resourceRecords"))?;
    url.query_pairs_mut().append_pair("filter", filter);

    let mut records = Vec::new();
    let mut next: Option<Url> = Some(url);
    let mut page_count = 0;

    while let Some(page_url) = next.take() {
        page_count += 1;
        if page_count > MAX_SEARCH_PAGES {
            return Err(BlueCatError::InvalidResponse {
                url: page_url.to_string(),
                reason: format!("search did not finish within {MAX_SEARCH_PAGES} pages"),
            });
        }

        let response = client
            .send(ctx, Method::GET, &page_url, None::<&()>, &[])
            .await?;
        if response.status == StatusCode::NOT_FOUND {
            return Err(BlueCatError::NotFound {
                resource: "zone".to_string(),
                name: zone_id.to_string(),
            });
        }
        let page: Collection<ResourceRecord> = response.into_json()?;

        if let Some(href) = page.next_href() {
            next = Some(client.resolve_href(href)?);
        }

        debug!(
            zone_id = zone_id,
            page = page_count,
            items_in_page = page.data.len(),
            total_items = records.len() + page.data.len(),
            "Fetched page of BlueCat resource records"
        );
        records.extend(page.data);
    }

    Ok(records)
}

/// List the TXT records at `fqdn` in zone `zone_id`.
///
/// Issues `GET /zones/{zone_id}/resourceRecords` filtered on type and
/// absolute name and follows `_links.next` until the last page.
///
/// # Errors
///
/// Returns [`BlueCatError::Validation`] for a non-positive `zone_id`,
/// [`BlueCatError::NotFound`] if the zone is gone, or the classified
/// HTTP/transport error.
pub async fn list_txt_records(
    client: &BlueCatClient,
    ctx: &CallContext,
    zone_id: i64,
    fqdn: &str,
) -> Result<Vec<ResourceRecord>> {
    require_positive("zone ID", zone_id)?;
    let fqdn = filter_literal("record name", trim_trailing_dot(fqdn.trim()))?;
    if fqdn.is_empty() {
        return Err(BlueCatError::validation("record name is required"));
    }

    let filter = format!("type:eq('{TXT_RECORD_TYPE}') and absoluteName:eq('{fqdn}')");
    search_records(client, ctx, zone_id, &filter).await
}

/// Create a TXT record holding `token` at `relative_name` in zone `zone_id`.
///
/// Issues `POST /zones/{zone_id}/resourceRecords`. When BlueCat answers
/// `409 Conflict`, the records at that name are searched and an identical
/// record (same name, same token) turns the conflict into success.
///
/// # Errors
///
/// Returns [`BlueCatError::Validation`] for a non-positive `zone_id` or an
/// empty token, or the classified HTTP/transport error.
pub async fn create_txt_record(
    client: &BlueCatClient,
    ctx: &CallContext,
    zone_id: i64,
    relative_name: &str,
    token: &str,
    ttl: Option<u32>,
) -> Result<()> {
    require_positive("zone ID", zone_id)?;
    if token.is_empty() {
        return Err(BlueCatError::validation("TXT record token is required"));
    }

    let name = filter_literal("record name", api_record_name(relative_name))?;
    let url = client.endpoint(&format!("zones/{zone_id}/resourceRecords"))?;
    let body = CreateTxtRecordRequest {
        record_type: TXT_RECORD_TYPE,
        name,
        rdata: quote_txt(token),
        ttl,
    };

    let response = client
        .send(ctx, Method::POST, &url, Some(&body), &[])
        .await?;

    if response.status.is_success() {
        info!(
            zone_id = zone_id,
            name = %relative_name,
            "Created TXT record"
        );
        return Ok(());
    }

    if response.status == StatusCode::CONFLICT {
        let filter = format!("type:eq('{TXT_RECORD_TYPE}') and name:eq('{name}')");
        let existing = search_records(client, ctx, zone_id, &filter).await?;
        let identical = existing.iter().any(|record| {
            record.is_txt()
                && record.name.as_deref().unwrap_or_default() == name
                && record.txt_value() == token
        });
        if identical {
            info!(
                zone_id = zone_id,
                name = %relative_name,
                "TXT record already exists with identical content"
            );
            return Ok(());
        }
        debug!(
            zone_id = zone_id,
            name = %relative_name,
            existing = existing.len(),
            "TXT record creation conflicted with different content"
        );
    }

    Err(map_http_status(
        &response.url,
        response.status.as_u16(),
        response.body,
    ))
}

/// Delete the resource record `record_id`.
///
/// Issues `DELETE /resourceRecords/{record_id}`. A 404 means the record is
/// already gone and counts as success.
///
/// # Errors
///
/// Returns [`BlueCatError::Validation`] for a non-positive `record_id`, or
/// the classified HTTP/transport error.
pub async fn delete_txt_record(
    client: &BlueCatClient,
    ctx: &CallContext,
    record_id: i64,
) -> Result<()> {
    require_positive("record ID", record_id)?;

    let url = client.endpoint(&format!("resourceRecords/{record_id}"))?;
    let response = client
        .send(ctx, Method::DELETE, &url, None::<&()>, &[])
        .await?;

    if response.status == StatusCode::NOT_FOUND {
        debug!(record_id = record_id, "TXT record already deleted");
        return Ok(());
    }

    response.into_success()?;
    info!(record_id = record_id, "Deleted TXT record");
    Ok(())
}
