use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::cache::token::CachedToken;
use crate::config::settings::VaultConfig;
use crate::helpers::time::unix_ts_in;
use crate::utils::constants::{
    DEFAULT_VAULT_ADDR, HEADER_VAULT_NAMESPACE, HEADER_VAULT_TOKEN,
};
use crate::vault::error::VaultError;

/// Secret-store operations the credential retrieval needs.
///
/// One token at a time is "active" on the client; `read_secret` uses it.
/// `renew_self` and `lookup_self` act on the token passed in.
pub trait SecretStore: Send + Sync {
    fn from_config(cfg: &VaultConfig) -> Result<Self>
    where
        Self: Sized;

    fn set_token(&mut self, token: &str);

    fn clear_token(&mut self);

    fn renew_self(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

    fn lookup_self(&self, token: &str) -> impl Future<Output = Result<TokenLookup>> + Send;

    /// Read the secret at `path` with the active token and return its `data` block.
    fn read_secret(&self, path: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// `data` block of `auth/token/lookup-self`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenLookup {
    #[serde(default)]
    pub ttl: u64,
    #[serde(default)]
    pub renewable: bool,
    pub expire_time: Option<String>,
}

impl TokenLookup {
    /// Turn the lookup into a cache record for `token`.
    /// Tokens without an expiry (root tokens) never expire.
    pub fn into_cached_token(self, token: String) -> CachedToken {
        let expiration = match self.expire_time.as_deref() {
            Some(expire_time) => DateTime::parse_from_rfc3339(expire_time)
                .map(|ts| ts.timestamp())
                .unwrap_or_else(|_| unix_ts_in(self.ttl)),
            None if self.ttl == 0 => i64::MAX,
            None => unix_ts_in(self.ttl),
        };
        CachedToken::new(token, expiration, self.renewable)
    }
}

#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: T,
}

pub fn build_http_client(cfg: &VaultConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .build()
        .context("building Vault HTTP client")
}

/// Vault address with a trailing-slash free `v1` API path.
pub fn api_url(address: &str, path: &str) -> String {
    format!(
        "{}/v1/{}",
        address.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Read the body of a finished request, mapping non-2xx statuses to `VaultError`.
pub async fn read_body(response: Response) -> Result<String, VaultError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(VaultError::from_status(status, &body));
    }
    Ok(body)
}

/// Vault HTTP API client.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: Client,
    address: String,
    namespace: Option<String>,
    token: Option<String>,
}

impl VaultClient {
    pub fn new(cfg: &VaultConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(cfg)?,
            address: cfg
                .address
                .clone()
                .unwrap_or_else(|| DEFAULT_VAULT_ADDR.to_owned()),
            namespace: cfg.namespace.clone(),
            token: None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, api_url(&self.address, path))
            .header(HEADER_VAULT_TOKEN, token);
        if let Some(namespace) = &self.namespace {
            request = request.header(HEADER_VAULT_NAMESPACE, namespace);
        }
        request
    }
}

impl SecretStore for VaultClient {
    fn from_config(cfg: &VaultConfig) -> Result<Self> {
        VaultClient::new(cfg)
    }

    fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_owned());
    }

    fn clear_token(&mut self) {
        self.token = None;
    }

    async fn renew_self(&self, token: &str) -> Result<()> {
        let response = self
            .request(Method::POST, "auth/token/renew-self", token)
            .json(&json!({}))
            .send()
            .await
            .map_err(VaultError::from)?;
        read_body(response).await?;
        debug!("token renewed");
        Ok(())
    }

    async fn lookup_self(&self, token: &str) -> Result<TokenLookup> {
        let response = self
            .request(Method::GET, "auth/token/lookup-self", token)
            .send()
            .await
            .map_err(VaultError::from)?;
        let body = read_body(response).await?;
        let parsed: DataResponse<TokenLookup> = serde_json::from_str(&body)
            .map_err(|err| VaultError::InvalidResponse(format!("token lookup: {}", err)))?;
        Ok(parsed.data)
    }

    async fn read_secret(&self, path: &str) -> Result<Value> {
        let token = self.token.as_deref().ok_or(VaultError::MissingToken)?;
        let response = self
            .request(Method::GET, path, token)
            .send()
            .await
            .map_err(VaultError::from)?;
        let body = read_body(response).await?;
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|err| VaultError::InvalidResponse(format!("secret '{}': {}", path, err)))?;
        parsed
            .get("data")
            .cloned()
            .filter(|data| !data.is_null())
            .ok_or_else(|| anyhow!("secret '{}' has no data", path))
    }
}
