// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for BlueCat solver operations.
//!
//! This module provides the single error taxonomy shared by configuration
//! handling, name utilities, the BlueCat HTTP client and the challenge solver:
//!
//! - Configuration and URL errors (fatal, not retryable)
//! - Authentication failures (fatal until credentials are rotated)
//! - Missing zones or records (often non-fatal, e.g. idempotent delete)
//! - Caller bugs such as a zero zone ID
//! - Transient network and 5xx failures (retryable by the caller)
//! - Cancellation and deadline expiry
//!
//! None of the functions in this crate retry. Callers inspect
//! [`BlueCatError::is_transient`] to decide whether to back off and try again.

use thiserror::Error;

/// Errors returned by every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlueCatError {
    /// Missing or malformed provider configuration field
    #[error("Invalid provider configuration: {field}: {reason}")]
    Config {
        /// The configuration field at fault (e.g., `zone`, `passwordSecretRef`)
        field: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// API host or path could not be turned into a base URL
    #[error("Invalid BlueCat API URL '{input}': {reason}")]
    Url {
        /// The host/path input that failed to parse
        input: String,
        /// Parser diagnostic
        reason: String,
    },

    /// BlueCat rejected the credentials (HTTP 401 or 403)
    #[error("BlueCat authentication failed for {url} (HTTP {status}): {message}")]
    Auth {
        /// The request URL that was rejected
        url: String,
        /// HTTP status code (401 or 403)
        status: u16,
        /// Response body returned by BlueCat
        message: String,
    },

    /// Zone or record does not exist
    #[error("BlueCat {resource} '{name}' not found")]
    NotFound {
        /// Kind of resource that was looked up (`zone`, `resource record`)
        resource: String,
        /// Name or ID that was looked up
        name: String,
    },

    /// A required call argument was missing or out of range
    ///
    /// Raised before any network traffic. This always indicates a caller bug.
    #[error("Invalid request: {reason}")]
    Validation {
        /// Explanation of the missing or invalid argument
        reason: String,
    },

    /// Network failure, timeout, rate limit or BlueCat 5xx
    #[error("Transient BlueCat API failure for {url}: {reason}")]
    Transient {
        /// The request URL that failed
        url: String,
        /// Underlying transport error or status summary
        reason: String,
    },

    /// The call context was cancelled or its deadline passed
    #[error("Operation cancelled: {reason}")]
    Cancelled {
        /// Either `cancelled` or `deadline exceeded`
        reason: String,
    },

    /// BlueCat returned an unexpected status code
    #[error("Unexpected BlueCat API response from {url}: HTTP {status}: {body}")]
    Api {
        /// The request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, kept verbatim for diagnostics
        body: String,
    },

    /// BlueCat answered with a success status but an unusable body
    #[error("Invalid BlueCat API response from {url}: {reason}")]
    InvalidResponse {
        /// The request URL
        url: String,
        /// Decoding failure
        reason: String,
    },

    /// The password secret could not be read
    #[error("Failed to resolve secret '{namespace}/{name}' key '{key}': {reason}")]
    Secret {
        /// Namespace the secret was read from
        namespace: String,
        /// Secret name
        name: String,
        /// Data key inside the secret
        key: String,
        /// Why resolution failed
        reason: String,
    },
}

/// Convenience alias used throughout the library.
pub type Result<T, E = BlueCatError> = std::result::Result<T, E>;

impl BlueCatError {
    /// Build a [`BlueCatError::Config`] error.
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`BlueCatError::Validation`] error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Returns true if this error is transient and the operation should be retried.
    ///
    /// Only network failures, timeouts, rate limiting and server-side errors
    /// qualify. Cancellation is deliberately excluded: the caller asked to stop.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transient { .. } => true,

            Self::Config { .. }
            | Self::Url { .. }
            | Self::Auth { .. }
            | Self::NotFound { .. }
            | Self::Validation { .. }
            | Self::Cancelled { .. }
            | Self::Api { .. }
            | Self::InvalidResponse { .. }
            | Self::Secret { .. } => false,
        }
    }

    /// Returns true for [`BlueCatError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns a stable reason code for this error.
    ///
    /// Used as a metrics label and as the `reason` field in structured logs.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigError",
            Self::Url { .. } => "URLError",
            Self::Auth { .. } => "AuthError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Validation { .. } => "ValidationError",
            Self::Transient { .. } => "TransientError",
            Self::Cancelled { .. } => "CancelledError",
            Self::Api { .. } => "APIError",
            Self::InvalidResponse { .. } => "InvalidResponse",
            Self::Secret { .. } => "SecretError",
        }
    }

    /// HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
