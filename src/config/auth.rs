use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use tokio::fs;

use crate::config::sinks::SinkConfig;
use crate::utils::constants::{
    DEFAULT_K8S_TOKEN_PATH, METHOD_APPROLE, METHOD_JWT, METHOD_KUBERNETES, METHOD_TOKEN,
};

/// ================================
/// auto_auth block
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AutoAuthConfig {
    pub method: MethodConfig,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MethodConfig {
    /// defaults to `auth/<type>`
    pub mount_path: Option<String>,
    /// request a response-wrapped token with this TTL (seconds)
    pub wrap_ttl: Option<u64>,
    #[serde(flatten)]
    pub kind: MethodKindConfig,
}

impl MethodConfig {
    pub fn mount_path(&self) -> String {
        self.mount_path
            .as_deref()
            .map(|path| path.trim_matches('/').to_owned())
            .unwrap_or_else(|| format!("auth/{}", self.kind.type_name()))
    }
}

/// Login method, selected by `type`.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MethodKindConfig {
    #[serde(rename = "approle")]
    AppRole {
        role_id: GenericValue,
        secret_id: Option<GenericValue>,
    },
    Jwt {
        role: String,
        jwt: GenericValue,
    },
    Kubernetes {
        role: String,
        #[serde(default = "default_k8s_token_path")]
        token_path: String,
    },
    Token {
        token: GenericValue,
    },
}

impl MethodKindConfig {
    pub fn type_name(&self) -> &'static str {
        match self {
            MethodKindConfig::AppRole { .. } => METHOD_APPROLE,
            MethodKindConfig::Jwt { .. } => METHOD_JWT,
            MethodKindConfig::Kubernetes { .. } => METHOD_KUBERNETES,
            MethodKindConfig::Token { .. } => METHOD_TOKEN,
        }
    }
}

/// Where a credential value comes from.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum GenericValue {
    Literal { value: String },
    FromEnv { from_env: String },
    FromFile { path: String },
}

impl GenericValue {
    /// Resolve to the concrete string. File contents are trimmed.
    pub async fn resolve(&self) -> Result<String> {
        match self {
            GenericValue::Literal { value } => Ok(value.to_owned()),
            GenericValue::FromEnv { from_env } => env::var(from_env)
                .map_err(|err| anyhow!("env variable '{}': {}", from_env, err)),
            GenericValue::FromFile { path } => fs::read_to_string(path)
                .await
                .with_context(|| format!("reading '{}'", path))
                .map(|content| content.trim().to_string()),
        }
    }
}

fn default_k8s_token_path() -> String {
    DEFAULT_K8S_TOKEN_PATH.to_owned()
}
