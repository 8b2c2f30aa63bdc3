// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # BlueCat Webhook - cert-manager DNS-01 solver for BlueCat Address Manager
//!
//! This crate publishes and removes ACME DNS-01 challenge TXT records through
//! the BlueCat Address Manager v2 REST API.
//!
//! ## Overview
//!
//! - Provider configuration decoding and validation
//! - Credential normalization and API base URL resolution
//! - Zone lookup, TXT record search/create/delete and quick deployment
//! - Idempotent Present/CleanUp orchestration
//!
//! ## Modules
//!
//! - [`solver`] - Present/CleanUp orchestration
//! - [`bluecat`] - Authenticated BlueCat REST client
//! - [`config`] - Provider configuration and validation
//! - [`names`] - Credential, URL and DNS name helpers
//! - [`records`] - TXT record model and matching
//! - [`secrets`] - Password secret resolution
//! - [`call_context`] - Cancellation and deadlines for API calls
//!
//! ## Example
//!
//! ```rust
//! use bluecat_webhook::config::{validate_config, ProviderConfig, SecretKeySelector};
//! use bluecat_webhook::names::to_relative_name;
//!
//! let config = ProviderConfig {
//!     api_host: "bam.example.internal".to_string(),
//!     zone: "example.com.".to_string(),
//!     username: "cert-manager".to_string(),
//!     password_secret_ref: Some(SecretKeySelector::new("bluecat-auth", "password")),
//!     ..Default::default()
//! };
//!
//! assert!(validate_config(&config).is_ok());
//! assert_eq!(
//!     to_relative_name("_acme-challenge.example.com.", &config.zone),
//!     "_acme-challenge"
//! );
//! ```

pub mod bluecat;
pub mod call_context;
pub mod config;
pub mod constants;
pub mod errors;
pub mod http_errors;
pub mod metrics;
pub mod names;
pub mod records;
pub mod secrets;
pub mod solver;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod names_tests;
