// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for name and credential utilities.

#[cfg(test)]
mod tests {
    use crate::errors::BlueCatError;
    use crate::names::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    // =====================================================
    // Credential Normalization Tests
    // =====================================================

    #[test]
    fn test_normalize_already_encoded() {
        assert_eq!(
            normalize_basic_credential("YWRtaW46YWRtaW4="),
            "YWRtaW46YWRtaW4="
        );
    }

    #[test]
    fn test_normalize_username_password() {
        assert_eq!(normalize_basic_credential("admin:admin"), "YWRtaW46YWRtaW4=");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "admin:admin",
            "cert-manager:s3cr3t!",
            "api:Zm9vYmFy",
            "svc-acme:p@ss word",
            "admin:pa:ss",
            "cert-manager:tok:en:with:colons",
        ] {
            let once = normalize_basic_credential(&BASE64.encode(raw));
            let twice = normalize_basic_credential(&once);
            assert_eq!(once, twice, "normalization of {raw:?} is not idempotent");
            assert_eq!(once, BASE64.encode(raw));
        }
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_basic_credential("  YWRtaW46YWRtaW4=\n"),
            "YWRtaW46YWRtaW4="
        );
    }

    #[test]
    fn test_normalize_base64_without_separator_is_encoded_again() {
        // "YWRtaW4=" decodes to "admin", which has no ':' and is not a credential
        assert_eq!(
            normalize_basic_credential("YWRtaW4="),
            BASE64.encode("YWRtaW4=")
        );
    }

    #[test]
    fn test_normalize_raw_password_with_colons_is_encoded_once() {
        assert_eq!(
            normalize_basic_credential("admin:pa:ss"),
            BASE64.encode("admin:pa:ss")
        );
        assert_eq!(
            normalize_basic_credential(&BASE64.encode("admin:pa:ss")),
            BASE64.encode("admin:pa:ss")
        );
    }

    #[test]
    fn test_normalize_base64_with_empty_user_is_encoded_again() {
        let encoded_empty_user = BASE64.encode(":password");
        assert_eq!(
            normalize_basic_credential(&encoded_empty_user),
            BASE64.encode(&encoded_empty_user)
        );
    }

    // =====================================================
    // API Base URL Tests
    // =====================================================

    #[test]
    fn test_resolve_default_path() {
        assert_eq!(
            resolve_api_base_url("bam.example.internal", "").unwrap(),
            "https://bam.example.internal/api/v2"
        );
    }

    #[test]
    fn test_resolve_custom_path() {
        assert_eq!(
            resolve_api_base_url("https://bam.example.internal", "/api/v2").unwrap(),
            "https://bam.example.internal/api/v2"
        );
    }

    #[test]
    fn test_resolve_host_already_has_path() {
        assert_eq!(
            resolve_api_base_url("https://bam.example.internal/api/v2", "").unwrap(),
            "https://bam.example.internal/api/v2"
        );
    }

    #[test]
    fn test_resolve_api_path_overrides_host_path() {
        assert_eq!(
            resolve_api_base_url("https://bam.example.internal/legacy/", "rest/v2/").unwrap(),
            "https://bam.example.internal/rest/v2"
        );
    }

    #[test]
    fn test_resolve_keeps_port_and_scheme() {
        assert_eq!(
            resolve_api_base_url("http://10.0.0.5:8080", "").unwrap(),
            "http://10.0.0.5:8080/api/v2"
        );
        assert_eq!(
            resolve_api_base_url("bam.example.internal:8443", "").unwrap(),
            "https://bam.example.internal:8443/api/v2"
        );
    }

    #[test]
    fn test_resolve_strips_trailing_slash() {
        assert_eq!(
            resolve_api_base_url("https://bam.example.internal/api/v2/", "").unwrap(),
            "https://bam.example.internal/api/v2"
        );
    }

    #[test]
    fn test_resolve_root_path_uses_default() {
        assert_eq!(
            resolve_api_base_url("https://bam.example.internal/", "/").unwrap(),
            "https://bam.example.internal/api/v2"
        );
    }

    #[test]
    fn test_resolve_empty_host_fails() {
        let err = resolve_api_base_url("   ", "/api/v2").unwrap_err();
        assert!(matches!(err, BlueCatError::Url { .. }));
    }

    #[test]
    fn test_resolve_unparseable_host_fails() {
        for host in ["https://", "bam example internal", "https://[::1"] {
            let err = resolve_api_base_url(host, "").unwrap_err();
            assert_eq!(err.reason(), "URLError", "host {host:?} should be rejected");
        }
    }

    // =====================================================
    // Relative Name Tests
    // =====================================================

    #[test]
    fn test_relative_name_under_zone() {
        assert_eq!(
            to_relative_name("_acme-challenge.example.com.", "example.com."),
            "_acme-challenge"
        );
    }

    #[test]
    fn test_relative_name_zone_apex() {
        assert_eq!(to_relative_name("example.com.", "example.com."), "@");
    }

    #[test]
    fn test_relative_name_zone_mismatch() {
        assert_eq!(
            to_relative_name("_acme-challenge.other.com.", "example.com."),
            "_acme-challenge.other.com"
        );
    }

    #[test]
    fn test_relative_name_zone_without_trailing_dot() {
        assert_eq!(
            to_relative_name("_acme-challenge.www.example.com.", "example.com"),
            "_acme-challenge.www"
        );
    }

    #[test]
    fn test_relative_name_label_boundary() {
        // "badexample.com" ends with "example.com" but is not below it
        assert_eq!(
            to_relative_name("_acme-challenge.badexample.com.", "example.com."),
            "_acme-challenge.badexample.com"
        );
        assert!(!is_within_zone("_acme-challenge.badexample.com.", "example.com."));
    }

    #[test]
    fn test_relative_name_is_case_insensitive() {
        assert_eq!(
            to_relative_name("_ACME-Challenge.Example.COM.", "example.com."),
            "_ACME-Challenge"
        );
        assert_eq!(to_relative_name("EXAMPLE.com", "example.COM."), "@");
    }

    #[test]
    fn test_is_within_zone() {
        assert!(is_within_zone("example.com.", "example.com."));
        assert!(is_within_zone("_acme-challenge.example.com.", "example.com"));
        assert!(!is_within_zone("_acme-challenge.other.com.", "example.com."));
        assert!(!is_within_zone("example.com.", ""));
    }

    #[test]
    fn test_trim_trailing_dot_removes_one_dot() {
        assert_eq!(trim_trailing_dot("example.com."), "example.com");
        assert_eq!(trim_trailing_dot("example.com"), "example.com");
        assert_eq!(trim_trailing_dot("example.com.."), "example.com.");
    }
}
