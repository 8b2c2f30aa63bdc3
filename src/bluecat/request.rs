// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Low-level HTTP exchange with the BlueCat API.
//!
//! This module performs exactly one request per call and never retries.
//! Status codes are handed back untouched so each operation can decide which
//! ones it tolerates (e.g. 404 on delete); [`ApiResponse::into_success`]
//! applies the shared classification for everything else.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::call_context::CallContext;
use crate::constants::HAL_JSON;
use crate::errors::{BlueCatError, Result};
use crate::http_errors::{map_http_status, map_transport_error};

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Return the body of a 2xx response, or the classified error otherwise.
    pub(crate) fn into_success(self) -> Result<String> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            Err(map_http_status(&self.url, self.status.as_u16(), self.body))
        }
    }

    /// Decode the body of a 2xx response as JSON.
    pub(crate) fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        if !self.status.is_success() {
            return Err(map_http_status(&self.url, self.status.as_u16(), self.body));
        }
        self.json()
    }

    /// Decode the body as JSON.
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| BlueCatError::InvalidResponse {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }
}

/// Send one request to the BlueCat API.
///
/// `Accept: application/hal+json` is always sent; a body is JSON-encoded with
/// `Content-Type: application/hal+json`. `authorization` is attached verbatim
/// when non-empty. `headers` are appended last.
///
/// # Errors
///
/// Returns [`BlueCatError::Cancelled`] if `ctx` ends first, or a transport
/// error mapped by [`map_transport_error`]. Non-2xx statuses are not errors
/// at this level.
pub(crate) async fn send_request<B: Serialize + ?Sized>(
    ctx: &CallContext,
    http: &HttpClient,
    authorization: &str,
    method: Method,
    url: &Url,
    body: Option<&B>,
    headers: &[(&str, &str)],
) -> Result<ApiResponse> {
    ctx.check()?;

    debug!(
        method = %method,
        url = %url,
        has_body = body.is_some(),
        "HTTP API request to BlueCat"
    );

    let mut request = http
        .request(method.clone(), url.clone())
        .header(ACCEPT, HAL_JSON);

    if !authorization.is_empty() {
        request = request.header(AUTHORIZATION, authorization);
    }

    if let Some(body) = body {
        let payload = serde_json::to_vec(body).map_err(|e| {
            BlueCatError::validation(format!("failed to encode request body for {url}: {e}"))
        })?;
        request = request.header(CONTENT_TYPE, HAL_JSON).body(payload);
    }

    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let url_str = url.as_str().to_string();
    let response = ctx
        .run(async {
            let response = request
                .send()
                .await
                .map_err(|e| map_transport_error(&url_str, &e))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| map_transport_error(&url_str, &e))?;
            Ok(ApiResponse {
                url: url_str.clone(),
                status,
                body,
            })
        })
        .await?;

    debug!(
        method = %method,
        url = %url,
        status = %response.status,
        response_len = response.body.len(),
        "HTTP API response from BlueCat"
    );

    Ok(response)
}
