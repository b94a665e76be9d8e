use serde::Deserialize;

use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_TIMEOUT_SECONDS};

/// ================================
/// Global helper settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    /// deadline for the whole fresh-login path (login + persist)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub renewal: RenewalPolicy,
    pub retry: Option<RetryConfig>,
    pub logging: Option<LoggingConfig>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            renewal: RenewalPolicy::default(),
            retry: None,
            logging: None,
        }
    }
}

/// Which cached tokens get a `renew-self` call before they are used.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenewalPolicy {
    /// every cached token, failures ignored
    #[default]
    Always,
    /// only tokens inside the grace period before expiration
    GracePeriod,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    /// will be mutiply by 2 on every attempt until max_delay_ms
    pub base_delay_ms: Option<u64>,
    /// invariant: >= base_delay_ms.
    pub max_delay_ms: Option<u64>,
}

/// ================================
/// Vault connection
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct VaultConfig {
    /// falls back to VAULT_ADDR
    pub address: Option<String>,
    /// falls back to VAULT_NAMESPACE
    pub namespace: Option<String>,
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self { address: None, namespace: None, timeout_ms: default_http_timeout_ms() }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// stdout carries the credential protocol, so logs go to stderr unless a file is set
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat, file: Option<String>) -> Self {
        Self { level, format, file }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("error".to_owned(), LogFormat::Compact, None)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
