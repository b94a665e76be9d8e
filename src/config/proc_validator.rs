//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * secret path and auto_auth presence
//!   * login method fields per type
//!   * sink paths and permissions
//!   * timeout / logging / retry invariants

use std::path::Path;
use tracing::{error, info};

use crate::config::auth::{AutoAuthConfig, GenericValue, MethodKindConfig};
use crate::config::settings::{RetryConfig, SettingsConfig, VaultConfig};
use crate::config::sinks::SinkConfig;
use crate::config::types::ServiceConfig;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_vault(&cfg.vault, &mut errors);

    match cfg.secret.as_deref() {
        None => errors.push("config: 'secret' is missing; the Vault path of the registry credentials is required".to_string()),
        Some(secret) if secret.trim().is_empty() => {
            errors.push("config: 'secret' must not be empty".to_string())
        }
        Some(_) => {}
    }

    match &cfg.auto_auth {
        None => errors.push("config: 'auto_auth' block is missing".to_string()),
        Some(auto_auth) => validate_auto_auth(auto_auth, &mut errors),
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.timeout_seconds == 0 {
        errors.push("settings.timeout_seconds must be > 0".to_string());
    }

    // retry invariants
    if let Some(retry) = &settings.retry {
        validate_retry("settings.retry", retry, errors);
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
        if let Some(file) = &logging.file {
            if !Path::new(file).is_absolute() {
                errors.push(format!(
                    "settings.logging.file '{}' must be an absolute path, relative paths are not allowed",
                    file
                ));
            }
        }
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if let Some(attempts) = retry.attempts {
        if attempts == 0 {
            errors.push(format!("{}.attempts must be > 0", path));
        }
    }
    if let (Some(base), Some(max)) = (retry.base_delay_ms, retry.max_delay_ms) {
        if max < base {
            errors.push(format!(
                "{}.max_delay_ms ({}) must be >= base_delay_ms ({})",
                path, max, base
            ));
        }
    }
}

fn validate_vault(vault: &VaultConfig, errors: &mut Vec<String>) {
    if let Some(address) = &vault.address {
        if !(address.starts_with("http://") || address.starts_with("https://")) {
            errors.push(format!(
                "vault.address '{}' must start with http:// or https://",
                address
            ));
        }
    }
    if vault.timeout_ms == 0 {
        errors.push("vault.timeout_ms must be > 0".to_string());
    }
}

fn validate_auto_auth(auto_auth: &AutoAuthConfig, errors: &mut Vec<String>) {
    let method = &auto_auth.method;
    let method_path = format!("auto_auth.method[{}]", method.kind.type_name());

    if let Some(mount_path) = &method.mount_path {
        if mount_path.trim_matches('/').is_empty() {
            errors.push(format!("{}.mount_path must not be empty", method_path));
        }
    }
    if method.wrap_ttl == Some(0) {
        errors.push(format!("{}.wrap_ttl must be > 0 when set", method_path));
    }

    match &method.kind {
        MethodKindConfig::AppRole { role_id, secret_id } => {
            validate_generic_value(&format!("{}.role_id", method_path), role_id, errors);
            if let Some(secret_id) = secret_id {
                validate_generic_value(&format!("{}.secret_id", method_path), secret_id, errors);
            }
        }
        MethodKindConfig::Jwt { role, jwt } => {
            if role.is_empty() {
                errors.push(format!("{}.role must not be empty", method_path));
            }
            validate_generic_value(&format!("{}.jwt", method_path), jwt, errors);
        }
        MethodKindConfig::Kubernetes { role, token_path } => {
            if role.is_empty() {
                errors.push(format!("{}.role must not be empty", method_path));
            }
            if !Path::new(token_path).is_absolute() {
                errors.push(format!(
                    "{}.token_path '{}' must be an absolute path, relative paths are not allowed",
                    method_path, token_path
                ));
            }
        }
        MethodKindConfig::Token { token } => {
            validate_generic_value(&format!("{}.token", method_path), token, errors);
        }
    }

    if auto_auth.sinks.is_empty() {
        errors.push("auto_auth.sinks is empty; at least one sink required".to_string());
    }
    for (idx, sink) in auto_auth.sinks.iter().enumerate() {
        validate_sink_basics(idx, sink, errors);
    }

    // two sinks writing the same file race each other
    let mut seen = std::collections::HashSet::new();
    for sink in &auto_auth.sinks {
        let SinkConfig::File(file) = sink;
        if !seen.insert(file.path.as_str()) {
            errors.push(format!("auto_auth.sinks: duplicate file path '{}'", file.path));
        }
    }
}

fn validate_generic_value(path: &str, value: &GenericValue, errors: &mut Vec<String>) {
    match value {
        GenericValue::Literal { value } => {
            if value.is_empty() {
                errors.push(format!("{}.value must not be empty", path));
            }
        }
        GenericValue::FromEnv { from_env } => {
            if from_env.is_empty() {
                errors.push(format!("{}.from_env must name a variable", path));
            }
        }
        GenericValue::FromFile { path: file } => {
            if !Path::new(file).is_absolute() {
                errors.push(format!(
                    "{}.path '{}' must be an absolute path, relative paths are not allowed",
                    path, file
                ));
            }
        }
    }
}

fn validate_sink_basics(idx: usize, sink: &SinkConfig, errors: &mut Vec<String>) {
    match sink {
        SinkConfig::File(cfg) => {
            if !Path::new(&cfg.path).is_absolute() {
                errors.push(format!(
                    "auto_auth.sinks[{}].path '{}' must be an absolute path, relative paths are not allowed",
                    idx, cfg.path
                ));
            }
            if cfg.mode > 0o777 {
                errors.push(format!(
                    "auto_auth.sinks[{}].mode {:o} is not a valid permission set",
                    idx, cfg.mode
                ));
            }
        }
    }
}
