// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for provider configuration.

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::errors::BlueCatError;
    use serde_json::json;
    use std::io::Write;
    use std::time::Duration;

    fn valid_config() -> ProviderConfig {
        ProviderConfig {
            api_host: "https://bam.example.internal".to_string(),
            zone: "example.com".to_string(),
            username: "cert-manager".to_string(),
            password_secret_ref: Some(SecretKeySelector::new("bluecat-auth", "password")),
            insecure_skip_tls_verify: true,
            ..Default::default()
        }
    }

    fn assert_config_error(cfg: &ProviderConfig, field: &str) {
        match validate_config(cfg) {
            Err(BlueCatError::Config { field: got, .. }) => assert_eq!(got, field),
            other => panic!("expected config error for {field}, got {other:?}"),
        }
    }

    // ============================================================================
    // validate_config
    // ============================================================================

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_password_secret_ref() {
        let cfg = ProviderConfig {
            password_secret_ref: None,
            ..valid_config()
        };
        assert_config_error(&cfg, "passwordSecretRef");
    }

    #[test]
    fn test_validate_rejects_empty_secret_name_and_key() {
        let cfg = ProviderConfig {
            password_secret_ref: Some(SecretKeySelector::new("", "password")),
            ..valid_config()
        };
        assert_config_error(&cfg, "passwordSecretRef.name");

        let cfg = ProviderConfig {
            password_secret_ref: Some(SecretKeySelector::new("bluecat-auth", "")),
            ..valid_config()
        };
        assert_config_error(&cfg, "passwordSecretRef.key");
    }

    #[test]
    fn test_validate_rejects_empty_zone() {
        for zone in ["", "  ", "."] {
            let cfg = ProviderConfig {
                zone: zone.to_string(),
                ..valid_config()
            };
            assert_config_error(&cfg, "zone");
        }
    }

    #[test]
    fn test_validate_rejects_empty_username() {
        let cfg = ProviderConfig {
            username: String::new(),
            ..valid_config()
        };
        assert_config_error(&cfg, "username");
    }

    #[test]
    fn test_validate_rejects_empty_api_host() {
        let cfg = ProviderConfig {
            api_host: String::new(),
            ..valid_config()
        };
        assert_config_error(&cfg, "apiHost");
    }

    #[test]
    fn test_validate_rejects_zero_ttl_and_timeout() {
        let cfg = ProviderConfig {
            ttl: Some(0),
            ..valid_config()
        };
        assert_config_error(&cfg, "ttl");

        let cfg = ProviderConfig {
            timeout_seconds: Some(0),
            ..valid_config()
        };
        assert_config_error(&cfg, "timeoutSeconds");
    }

    #[test]
    fn test_validate_accepts_missing_optional_fields() {
        let cfg = ProviderConfig {
            api_path: None,
            quick_deploy: None,
            ttl: None,
            timeout_seconds: None,
            ..valid_config()
        };
        assert!(validate_config(&cfg).is_ok());
    }

    // ============================================================================
    // is_quick_deploy_enabled
    // ============================================================================

    #[test]
    fn test_quick_deploy_defaults_to_enabled() {
        assert!(is_quick_deploy_enabled(&ProviderConfig::default()));
    }

    #[test]
    fn test_quick_deploy_explicit_values() {
        let disabled = ProviderConfig {
            quick_deploy: Some(false),
            ..Default::default()
        };
        assert!(!is_quick_deploy_enabled(&disabled));

        let enabled = ProviderConfig {
            quick_deploy: Some(true),
            ..Default::default()
        };
        assert!(is_quick_deploy_enabled(&enabled));
    }

    // ============================================================================
    // decode_config / load_config_file
    // ============================================================================

    #[test]
    fn test_decode_camel_case_payload() {
        let raw = json!({
            "apiHost": "bam.example.internal",
            "apiPath": "/api/v2",
            "zone": "example.com.",
            "username": "cert-manager",
            "passwordSecretRef": { "name": "bluecat-auth", "key": "password" },
            "insecureSkipTLSVerify": true,
            "quickDeploy": false,
            "ttl": 60,
            "timeoutSeconds": 10
        });

        let cfg = decode_config(Some(&raw)).unwrap();
        assert_eq!(cfg.api_host, "bam.example.internal");
        assert_eq!(cfg.api_path.as_deref(), Some("/api/v2"));
        assert_eq!(
            cfg.password_secret_ref,
            Some(SecretKeySelector::new("bluecat-auth", "password"))
        );
        assert!(cfg.insecure_skip_tls_verify);
        assert_eq!(cfg.quick_deploy, Some(false));
        assert_eq!(cfg.ttl, Some(60));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_decode_accepts_lower_camel_tls_alias() {
        let raw = json!({ "insecureSkipTlsVerify": true });
        assert!(decode_config(Some(&raw)).unwrap().insecure_skip_tls_verify);
    }

    #[test]
    fn test_decode_missing_payload_fails() {
        assert!(matches!(
            decode_config(None),
            Err(BlueCatError::Config { .. })
        ));
        assert!(matches!(
            decode_config(Some(&serde_json::Value::Null)),
            Err(BlueCatError::Config { .. })
        ));
    }

    #[test]
    fn test_decode_wrong_types_fail() {
        let raw = json!({ "quickDeploy": "yes" });
        let err = decode_config(Some(&raw)).unwrap_err();
        assert!(err.to_string().contains("failed to decode"));
    }

    #[test]
    fn test_api_base_url_uses_path_override() {
        let cfg = ProviderConfig {
            api_host: "bam.example.internal/legacy".to_string(),
            api_path: Some("/api/v2".to_string()),
            ..valid_config()
        };
        assert_eq!(
            cfg.api_base_url().unwrap(),
            "https://bam.example.internal/api/v2"
        );
    }

    #[test]
    fn test_default_request_timeout() {
        assert_eq!(
            valid_config().request_timeout(),
            Duration::from_secs(crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_load_config_file_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "apiHost: bam.example.internal\n\
             zone: example.com\n\
             username: cert-manager\n\
             passwordSecretRef:\n  name: bluecat-auth\n  key: password\n"
        )
        .unwrap();

        let cfg = load_config_file(file.path()).unwrap();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.zone, "example.com");
    }

    #[test]
    fn test_load_config_file_missing() {
        let err = load_config_file(std::path::Path::new("/nonexistent/bluecat.yaml")).unwrap_err();
        assert_eq!(err.reason(), "ConfigError");
    }

    #[test]
    fn test_config_schema_lists_fields() {
        let schema = config_schema();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["apiHost", "zone", "username", "passwordSecretRef", "quickDeploy"] {
            assert!(properties.contains_key(field), "schema missing {field}");
        }
        assert!(properties.contains_key("insecureSkipTLSVerify"));
    }
}
