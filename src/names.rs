// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Name and credential utilities.
//!
//! Pure string transforms used by the client and the solver:
//!
//! - [`normalize_basic_credential`] - make a basic-auth credential base64 exactly once
//! - [`resolve_api_base_url`] - compose the BlueCat API root from host and path
//! - [`to_relative_name`] - strip a zone suffix from an FQDN
//!
//! None of these functions perform I/O.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use url::Url;

use crate::constants::{DEFAULT_API_PATH, DEFAULT_API_SCHEME, ZONE_APEX};
use crate::errors::{BlueCatError, Result};

/// Normalize a basic-auth credential to its base64-encoded `user:pass` form.
///
/// The input is either a raw `user:pass` string or a credential that is
/// already encoded (BlueCat's `basicAuthenticationCredentials` session field
/// is the latter). The input is treated as already encoded only when it
/// decodes to printable UTF-8 whose first `:` follows a non-empty user part,
/// so the function is idempotent:
/// `normalize_basic_credential(&normalize_basic_credential(x)) == normalize_basic_credential(x)`.
///
/// # Example
///
/// ```rust
/// use bluecat_webhook::names::normalize_basic_credential;
///
/// assert_eq!(normalize_basic_credential("admin:admin"), "YWRtaW46YWRtaW4=");
/// assert_eq!(normalize_basic_credential("YWRtaW46YWRtaW4="), "YWRtaW46YWRtaW4=");
/// ```
#[must_use]
pub fn normalize_basic_credential(input: &str) -> String {
    let input = input.trim();
    if is_encoded_credential(input) {
        return input.to_string();
    }
    BASE64.encode(input.as_bytes())
}

fn is_encoded_credential(input: &str) -> bool {
    let Ok(decoded) = BASE64.decode(input) else {
        return false;
    };
    let Ok(text) = String::from_utf8(decoded) else {
        return false;
    };
    if text.chars().any(char::is_control) {
        return false;
    }
    // The user-id cannot contain ':'; the password may
    text.split_once(':').is_some_and(|(user, _)| !user.is_empty())
}

/// Compose the absolute BlueCat API base URL.
///
/// Rules, in priority order:
/// 1. A host without a scheme gets `https://`.
/// 2. A non-empty `api_path` replaces any path already on the host.
/// 3. With an empty `api_path`, a non-root path on the host is kept.
/// 4. Otherwise the path defaults to `/api/v2`.
///
/// The result never ends with a slash.
///
/// # Errors
///
/// Returns [`BlueCatError::Url`] when the host is empty or cannot be parsed.
///
/// # Example
///
/// ```rust
/// use bluecat_webhook::names::resolve_api_base_url;
///
/// let url = resolve_api_base_url("bam.example.internal", "").unwrap();
/// assert_eq!(url, "https://bam.example.internal/api/v2");
/// ```
pub fn resolve_api_base_url(host: &str, api_path: &str) -> Result<String> {
    let host = host.trim();
    if host.is_empty() {
        return Err(BlueCatError::Url {
            input: host.to_string(),
            reason: "API host must not be empty".to_string(),
        });
    }

    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("{DEFAULT_API_SCHEME}://{host}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|e| BlueCatError::Url {
        input: host.to_string(),
        reason: e.to_string(),
    })?;
    let Some(host_str) = parsed.host_str().filter(|h| !h.is_empty()) else {
        return Err(BlueCatError::Url {
            input: host.to_string(),
            reason: "API host has no host component".to_string(),
        });
    };

    let mut origin = format!("{}://{host_str}", parsed.scheme());
    if let Some(port) = parsed.port() {
        origin.push_str(&format!(":{port}"));
    }

    let override_path = api_path.trim().trim_matches('/');
    let host_path = parsed.path().trim_matches('/');
    let path = if !override_path.is_empty() {
        format!("/{override_path}")
    } else if !host_path.is_empty() {
        format!("/{host_path}")
    } else {
        DEFAULT_API_PATH.to_string()
    };

    Ok(format!("{origin}{path}"))
}

/// Remove a single trailing dot from a DNS name.
#[must_use]
pub fn trim_trailing_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Return the part of `fqdn` that lies before `.zone`, if any.
fn strip_zone_suffix<'a>(fqdn: &'a str, zone: &str) -> Option<&'a str> {
    if zone.is_empty() || fqdn.len() <= zone.len() + 1 {
        return None;
    }
    let split = fqdn.len() - zone.len();
    if !fqdn.is_char_boundary(split) || !fqdn[split..].eq_ignore_ascii_case(zone) {
        return None;
    }
    fqdn[..split].strip_suffix('.').filter(|label| !label.is_empty())
}

/// Convert an absolute name into a name relative to `zone`.
///
/// Both inputs may carry a trailing dot; one is trimmed from each before
/// comparison, which is ASCII case-insensitive.
///
/// - `fqdn == zone` returns `@` (zone apex).
/// - A strict sub-name returns the labels in front of the zone.
/// - A name outside the zone is returned verbatim with its trailing dot
///   trimmed. Use [`is_within_zone`] to tell this case apart.
///
/// # Example
///
/// ```rust
/// use bluecat_webhook::names::to_relative_name;
///
/// assert_eq!(to_relative_name("_acme-challenge.example.com.", "example.com."), "_acme-challenge");
/// assert_eq!(to_relative_name("example.com.", "example.com"), "@");
/// assert_eq!(
///     to_relative_name("_acme-challenge.other.com.", "example.com."),
///     "_acme-challenge.other.com"
/// );
/// ```
#[must_use]
pub fn to_relative_name(fqdn: &str, zone: &str) -> String {
    let fqdn = trim_trailing_dot(fqdn);
    let zone = trim_trailing_dot(zone);

    if !zone.is_empty() && fqdn.eq_ignore_ascii_case(zone) {
        return ZONE_APEX.to_string();
    }

    strip_zone_suffix(fqdn, zone).unwrap_or(fqdn).to_string()
}

/// Returns true when `fqdn` is the apex of `zone` or a name below it.
#[must_use]
pub fn is_within_zone(fqdn: &str, zone: &str) -> bool {
    let fqdn = trim_trailing_dot(fqdn);
    let zone = trim_trailing_dot(zone);
    !zone.is_empty() && (fqdn.eq_ignore_ascii_case(zone) || strip_zone_suffix(fqdn, zone).is_some())
}
