// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the BlueCat DNS-01 solver.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Solver Constants
// ============================================================================

/// Name cert-manager uses to route challenges to this solver
pub const SOLVER_NAME: &str = "bluecat";

// ============================================================================
// BlueCat API Constants
// ============================================================================

/// Scheme prepended to an API host that was configured without one
pub const DEFAULT_API_SCHEME: &str = "https";

/// API path used when neither the host nor the config carries one
pub const DEFAULT_API_PATH: &str = "/api/v2";

/// Media type BlueCat's v2 REST API speaks
pub const HAL_JSON: &str = "application/hal+json";

/// Resource type of TXT records in the BlueCat data model
pub const TXT_RECORD_TYPE: &str = "TXTRecord";

/// Resource type of zones in the BlueCat data model
pub const ZONE_TYPE: &str = "Zone";

/// Deployment type that pushes pending zone changes immediately
pub const QUICK_DEPLOYMENT_TYPE: &str = "QuickDeployment";

/// Header controlling whether BlueCat forces a full zone retransfer on deploy
pub const FORCE_ZONE_RETRANSFER_HEADER: &str = "x-bcn-force-zone-retransfer";

/// Authorization scheme used with session credentials
pub const BASIC_AUTH_SCHEME: &str = "Basic";

/// Relative name denoting the zone apex
pub const ZONE_APEX: &str = "@";

// ============================================================================
// Timing Constants
// ============================================================================

/// Default per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default CLI deadline for a whole Present/CleanUp operation
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Kubernetes Constants
// ============================================================================

/// Namespace used when a challenge carries no resource namespace
pub const DEFAULT_NAMESPACE: &str = "cert-manager";
