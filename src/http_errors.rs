// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP status and transport error mapping to [`BlueCatError`].
//!
//! Every BlueCat API call funnels its failures through this module so that
//! status codes are classified the same way everywhere.
//!
//! # Usage
//!
//! ```rust
//! use bluecat_webhook::http_errors::map_http_status;
//!
//! let err = map_http_status("https://bam/api/v2/zones", 503, "maintenance".into());
//! assert!(err.is_transient());
//!
//! let err = map_http_status("https://bam/api/v2/zones", 401, String::new());
//! assert_eq!(err.reason(), "AuthError");
//! ```

use crate::errors::BlueCatError;

/// Map a non-success HTTP status code to an error.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Error | Meaning |
/// |-----------|-------|---------|
/// | 401 | `Auth` | Credentials rejected |
/// | 403 | `Auth` | Insufficient permissions |
/// | 404 | `NotFound` | Resource not found |
/// | 408 | `Transient` | Request timeout |
/// | 429 | `Transient` | Rate limited |
/// | 5xx | `Transient` | Server-side failure |
/// | Other | `Api` | Unexpected response, status and body preserved |
#[must_use]
pub fn map_http_status(url: &str, status_code: u16, body: String) -> BlueCatError {
    match status_code {
        401 | 403 => BlueCatError::Auth {
            url: url.to_string(),
            status: status_code,
            message: body,
        },
        404 => BlueCatError::NotFound {
            resource: "resource".to_string(),
            name: url.to_string(),
        },
        408 | 429 | 500..=599 => BlueCatError::Transient {
            url: url.to_string(),
            reason: format!("HTTP {status_code}: {body}"),
        },
        _ => BlueCatError::Api {
            url: url.to_string(),
            status: status_code,
            body,
        },
    }
}

/// Map a reqwest transport error (no HTTP status received) to an error.
///
/// Timeouts, connection failures and interrupted bodies are transient. Errors
/// building the request are caller bugs and map to `Validation`.
#[must_use]
pub fn map_transport_error(url: &str, err: &reqwest::Error) -> BlueCatError {
    if err.is_builder() {
        return BlueCatError::validation(format!("failed to build request for {url}: {err}"));
    }
    if let Some(status) = err.status() {
        return map_http_status(url, status.as_u16(), err.to_string());
    }
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    BlueCatError::Transient {
        url: url.to_string(),
        reason: format!("{kind}: {err}"),
    }
}
