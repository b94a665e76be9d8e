#[cfg(test)]
mod tests {

    use std::path::Path;

    use serial_test::serial;

    use crate::config::auth::{GenericValue, MethodKindConfig};
    use crate::config::proc_loader::{file_to_config, parse_config};
    use crate::config::proc_validator::validate_service_config;
    use crate::config::settings::RenewalPolicy;
    use crate::config::sinks::{SinkConfig, TokenFormat};
    use crate::ServiceConfig;

    fn demo(name: &str) -> ServiceConfig {
        let path = Path::new("demos").join(name);
        file_to_config(&path).unwrap_or_else(|e| panic!("demos/{name} must load: {e:#}"))
    }

    #[test]
    fn validate_demos_approle_is_valid() {
        let cfg = demo("approle.yaml");
        assert!(validate_service_config(&cfg).is_ok());

        let method = &cfg.auto_auth.as_ref().unwrap().method;
        assert_eq!(method.mount_path(), "auth/approle");
        assert!(matches!(
            &method.kind,
            MethodKindConfig::AppRole { role_id: GenericValue::FromFile { .. }, secret_id: Some(GenericValue::FromEnv { .. }) }
        ));
    }

    #[test]
    fn validate_demos_kubernetes_is_valid() {
        let cfg = demo("kubernetes.yaml");
        assert_eq!(cfg.settings.renewal, RenewalPolicy::GracePeriod);
        assert_eq!(cfg.vault.namespace.as_deref(), Some("platform"));
        assert_eq!(cfg.auto_auth.unwrap().method.mount_path(), "auth/k8s-prod");
    }

    #[test]
    fn validate_demos_jwt_wrapped_is_valid() {
        let cfg = demo("jwt_wrapped.yaml");
        let auto_auth = cfg.auto_auth.unwrap();
        assert_eq!(auto_auth.method.wrap_ttl, Some(60));
        assert_eq!(auto_auth.sinks.len(), 2);
        let SinkConfig::File(raw) = &auto_auth.sinks[1];
        assert_eq!(raw.format, TokenFormat::Raw);
        assert_eq!(raw.mode, 0o600);
    }

    #[test]
    fn validate_demos_token_is_valid() {
        let cfg = demo("token.yaml");
        assert_eq!(cfg.secret.as_deref(), Some("secret/docker"));
        assert_eq!(cfg.settings.timeout_seconds, 10);
        assert_eq!(cfg.vault.timeout_ms, 5000);
    }

    #[test]
    #[should_panic(expected = "config is not valid")]
    fn invalid_config_is_rejected_on_parse() {
        let invalid_yaml = r#"
auto_auth:
  method:
    type: approle
    role_id:
      value: r
  sinks: []
"#;
        parse_config(invalid_yaml.to_string()).unwrap();
    }

    #[test]
    fn invalid_config_reports_all_errors() {
        // no secret, zero timeout, relative sink path, duplicate sink, bad wrap ttl
        let invalid_yaml = r#"
settings:
  timeout_seconds: 0
  logging:
    level: loud
vault:
  address: vault.example.com
secret: ""
auto_auth:
  method:
    type: kubernetes
    role: ""
    wrap_ttl: 0
  sinks:
    - type: file
      path: relative/token
    - type: file
      path: /tmp/token
    - type: file
      path: /tmp/token
"#;
        let cfg: ServiceConfig = serde_yaml::from_str(invalid_yaml).unwrap();
        let errs = validate_service_config(&cfg).expect_err("invalid config unexpectedly validated");

        assert!(errs.iter().any(|e| e.contains("timeout_seconds")), "expected timeout error");
        assert!(errs.iter().any(|e| e.contains("settings.logging.level")), "expected log level error");
        assert!(errs.iter().any(|e| e.contains("vault.address")), "expected address error");
        assert!(errs.iter().any(|e| e.contains("'secret' must not be empty")), "expected secret error");
        assert!(errs.iter().any(|e| e.contains("role must not be empty")), "expected role error");
        assert!(errs.iter().any(|e| e.contains("wrap_ttl")), "expected wrap_ttl error");
        assert!(errs.iter().any(|e| e.contains("relative")), "expected relative path error");
        assert!(errs.iter().any(|e| e.contains("duplicate")), "expected duplicate sink error");
    }

    #[test]
    fn missing_secret_and_auto_auth_are_reported() {
        let cfg: ServiceConfig = serde_yaml::from_str("vault: {}").unwrap();
        let errs = validate_service_config(&cfg).unwrap_err();

        assert!(errs.iter().any(|e| e.contains("'secret' is missing")));
        assert!(errs.iter().any(|e| e.contains("'auto_auth' block is missing")));
    }

    #[tokio::test]
    async fn generic_value_reads_trimmed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("role-id");
        std::fs::write(&path, "role-from-file\n").unwrap();

        let from_file = GenericValue::FromFile { path: path.to_string_lossy().into_owned() };
        assert_eq!(from_file.resolve().await.unwrap(), "role-from-file");

        let missing = GenericValue::FromFile { path: dir.path().join("absent").to_string_lossy().into_owned() };
        assert!(missing.resolve().await.is_err());
    }

    #[test]
    #[serial]
    fn env_placeholders_are_expanded_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
vault:
  address: ${VAULT_LOGIN_TEST_ADDR:http://127.0.0.1:8200}
secret: ${VAULT_LOGIN_TEST_SECRET:secret/data/fallback}
auto_auth:
  method:
    type: approle
    role_id:
      value: r
  sinks:
    - type: file
      path: /tmp/vault-login-test-token
"#,
        )
        .unwrap();

        std::env::set_var("VAULT_LOGIN_TEST_SECRET", "secret/data/from-env");
        std::env::remove_var("VAULT_LOGIN_TEST_ADDR");
        let cfg = file_to_config(&path).unwrap();
        std::env::remove_var("VAULT_LOGIN_TEST_SECRET");

        assert_eq!(cfg.secret.as_deref(), Some("secret/data/from-env"));
        assert_eq!(cfg.vault.address.as_deref(), Some("http://127.0.0.1:8200"));
    }
}
