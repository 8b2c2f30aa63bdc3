// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the BlueCat Address Manager v2 REST API.

use serde::{Deserialize, Serialize};

/// A page of a BlueCat collection resource.
///
/// Collections are HAL documents: the items live in `data` and the link to
/// the following page, when there is one, in `_links.next`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    /// Number of items in this page
    #[serde(default)]
    pub count: Option<u64>,

    /// Total number of matching items, when the server reports it
    #[serde(default)]
    pub total_count: Option<u64>,

    /// Items in this page
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    /// HAL navigation links
    #[serde(rename = "_links", default)]
    pub links: Option<CollectionLinks>,
}

impl<T> Collection<T> {
    /// The `href` of the next page, if any.
    #[must_use]
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.next.as_ref())
            .map(|link| link.href.as_str())
            .filter(|href| !href.is_empty())
    }
}

/// Navigation links of a collection page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionLinks {
    /// Link to the following page
    #[serde(default)]
    pub next: Option<Link>,
}

/// A single HAL link.
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    /// Target of the link, absolute or relative to the API host
    pub href: String,
}

/// A DNS zone as returned by `GET /zones`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// BlueCat object ID
    pub id: i64,

    /// Resource type, `Zone` for DNS zones
    #[serde(rename = "type", default)]
    pub zone_type: String,

    /// Absolute zone name without a trailing dot
    #[serde(default)]
    pub absolute_name: String,
}

/// Body of `POST /sessions`.
#[derive(Serialize)]
pub(crate) struct SessionRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Base64 `user:token` credential for the `Basic` authorization scheme
    #[serde(default)]
    pub basic_authentication_credentials: Option<String>,

    /// Raw API token, used when no pre-encoded credential is returned
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Body of `POST /zones/{id}/resourceRecords` for TXT records.
#[derive(Debug, Serialize)]
pub(crate) struct CreateTxtRecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub rdata: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// Body of `POST /zones/{id}/deployments`.
#[derive(Debug, Serialize)]
pub(crate) struct DeploymentRequest<'a> {
    #[serde(rename = "type")]
    pub deployment_type: &'a str,
}
