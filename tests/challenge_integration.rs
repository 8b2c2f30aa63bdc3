// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end challenge lifecycle tests against a mocked BlueCat API.
//!
//! Run with: cargo test --test challenge_integration

use bluecat_webhook::call_context::CallContext;
use bluecat_webhook::secrets::StaticSecretResolver;
use bluecat_webhook::solver::{BlueCatSolver, ChallengeRequest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

const ZONE_ID: i64 = 7001;

fn solver() -> BlueCatSolver {
    BlueCatSolver::new(Arc::new(
        StaticSecretResolver::new().with_fallback("admin"),
    ))
}

fn challenge(server: &MockServer, fqdn: &str, key: &str) -> ChallengeRequest {
    ChallengeRequest {
        uid: "lifecycle".into(),
        resolved_fqdn: fqdn.into(),
        resolved_zone: "example.com.".into(),
        key: key.into(),
        resource_namespace: "cert-manager".into(),
        config: Some(json!({
            "apiHost": server.uri(),
            "apiPath": "/api/v2",
            "zone": "Example.COM.",
            "username": "admin",
            "passwordSecretRef": { "name": "bluecat", "key": "password" },
            "ttl": 60
        })),
    }
}

async fn mount_login_and_zone(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "basicAuthenticationCredentials": "YWRtaW46YWRtaW4="
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/zones"))
        .and(header("Authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "data": [{ "id": ZONE_ID, "type": "Zone", "absoluteName": "example.com" }]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_present_then_cleanup_lifecycle() {
    let server = MockServer::start().await;
    mount_login_and_zone(&server).await;

    let record = json!({
        "id": 501,
        "type": "TXTRecord",
        "name": "_acme-challenge",
        "absoluteName": "_acme-challenge.example.com",
        "rdata": "\"lifecycle-token\""
    });

    // First search (Present) sees nothing; later searches see the new record
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/resourceRecords")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0, "data": [] })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/resourceRecords")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "count": 1, "data": [record] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/resourceRecords")))
        .and(body_json(json!({
            "type": "TXTRecord",
            "name": "_acme-challenge",
            "rdata": "\"lifecycle-token\"",
            "ttl": 60
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(record.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/resourceRecords/501"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/deployments")))
        .and(header("x-bcn-force-zone-retransfer", "false"))
        .respond_with(ResponseTemplate::new(202))
        .expect(3)
        .mount(&server)
        .await;

    let solver = solver();
    let ctx = CallContext::background().with_timeout(Duration::from_secs(30));
    let request = challenge(&server, "_acme-challenge.example.com.", "lifecycle-token");

    let presented = solver.present(&ctx, &request).await.unwrap();
    assert_eq!(presented.zone_id, ZONE_ID);
    assert_eq!(presented.changed, 1);
    assert!(presented.deployed);

    // Repeating Present reuses the record and only redeploys
    let repeated = solver.present(&ctx, &request).await.unwrap();
    assert_eq!(repeated.changed, 0);
    assert!(repeated.deployed);

    let cleaned = solver.cleanup(&ctx, &request).await.unwrap();
    assert_eq!(cleaned.changed, 1);
    assert!(cleaned.deployed);
}

#[tokio::test]
async fn test_present_at_zone_apex() {
    let server = MockServer::start().await;
    mount_login_and_zone(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/resourceRecords")))
        .and(query_param(
            "filter",
            "type:eq('TXTRecord') and absoluteName:eq('example.com')",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/resourceRecords")))
        .and(body_json(json!({
            "type": "TXTRecord",
            "name": "",
            "rdata": "\"apex-token\"",
            "ttl": 60
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/deployments")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = solver()
        .present(
            &CallContext::background(),
            &challenge(&server, "example.com.", "apex-token"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.changed, 1);
}

#[tokio::test]
async fn test_cleanup_after_record_vanished_is_success() {
    let server = MockServer::start().await;
    mount_login_and_zone(&server).await;

    // Search still returns the record but it is gone by the time we delete it
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/resourceRecords")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 502,
                "type": "TXTRecord",
                "absoluteName": "_acme-challenge.example.com",
                "rdata": "\"gone-token\""
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/resourceRecords/502"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v2/zones/{ZONE_ID}/deployments")))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let outcome = solver()
        .cleanup(
            &CallContext::background(),
            &challenge(&server, "_acme-challenge.example.com", "gone-token"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.changed, 1);
}

#[tokio::test]
async fn test_server_outage_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/sessions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = solver()
        .present(
            &CallContext::background(),
            &challenge(&server, "_acme-challenge.example.com.", "token"),
        )
        .await
        .unwrap_err();
    assert!(err.is_transient(), "503 should be retryable, got {err:?}");
    assert_eq!(err.reason(), "TransientError");
}
