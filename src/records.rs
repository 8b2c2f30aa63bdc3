// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! BlueCat resource records and exact-match selection.
//!
//! BlueCat may hold several TXT records under one absolute name (two
//! concurrent challenges for the same domain, or stale tokens from earlier
//! attempts). A record is only ever considered "ours" when both its name and
//! its token match, which keeps create and delete idempotent no matter what
//! else lives at the same name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::TXT_RECORD_TYPE;
use crate::names::trim_trailing_dot;

/// A resource record as returned by the BlueCat v2 API.
///
/// Only the fields the solver needs are decoded; everything else in the
/// HAL document is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// BlueCat object ID
    pub id: i64,

    /// BlueCat resource type (e.g., `TXTRecord`, `HostRecord`)
    #[serde(rename = "type", default)]
    pub record_type: String,

    /// Name relative to the zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Absolute name without a trailing dot (e.g., `_acme-challenge.example.com`)
    #[serde(default)]
    pub absolute_name: String,

    /// Record data; for TXT records the text wrapped in double quotes
    #[serde(default)]
    pub rdata: String,

    /// Record TTL in seconds, when set on the record itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl ResourceRecord {
    /// Whether this record is a TXT record.
    #[must_use]
    pub fn is_txt(&self) -> bool {
        self.record_type == TXT_RECORD_TYPE
    }

    /// TXT payload with one pair of surrounding quotes removed.
    #[must_use]
    pub fn txt_value(&self) -> &str {
        unquote_txt(&self.rdata)
    }
}

/// Strip a single leading and a single trailing `"` from TXT record data.
#[must_use]
pub fn unquote_txt(rdata: &str) -> &str {
    let rdata = rdata.strip_prefix('"').unwrap_or(rdata);
    rdata.strip_suffix('"').unwrap_or(rdata)
}

/// Wrap a token in double quotes the way BlueCat stores TXT data.
#[must_use]
pub fn quote_txt(token: &str) -> String {
    format!("\"{token}\"")
}

/// Select the TXT records holding `token` at `fqdn`.
///
/// A record matches when its type is `TXTRecord`, its absolute name equals
/// `fqdn` (trailing dot trimmed, compared ASCII case-insensitively) and its
/// unquoted data equals `token` exactly. Input order is preserved so callers
/// can deterministically pick the first match.
///
/// `relative_name` only annotates the debug log.
///
/// # Example
///
/// ```rust
/// use bluecat_webhook::records::{find_txt_record_matches, ResourceRecord};
///
/// let records = vec![ResourceRecord {
///     id: 10,
///     record_type: "TXTRecord".into(),
///     absolute_name: "_acme-challenge.example.com".into(),
///     rdata: "\"token-1\"".into(),
///     ..Default::default()
/// }];
///
/// let matches = find_txt_record_matches(
///     &records,
///     "_acme-challenge.example.com.",
///     "_acme-challenge",
///     "token-1",
/// );
/// assert_eq!(matches.len(), 1);
/// ```
#[must_use]
pub fn find_txt_record_matches<'a>(
    records: &'a [ResourceRecord],
    fqdn: &str,
    relative_name: &str,
    token: &str,
) -> Vec<&'a ResourceRecord> {
    let fqdn = trim_trailing_dot(fqdn);

    let matches: Vec<&ResourceRecord> = records
        .iter()
        .filter(|record| {
            record.is_txt()
                && trim_trailing_dot(&record.absolute_name).eq_ignore_ascii_case(fqdn)
                && record.txt_value() == token
        })
        .collect();

    debug!(
        fqdn = %fqdn,
        relative_name = %relative_name,
        candidates = records.len(),
        matches = matches.len(),
        "Matched TXT records"
    );

    matches
}
