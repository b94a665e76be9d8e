use anyhow::{anyhow, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::AuthResponse;
use crate::config::auth::MethodConfig;
use crate::config::settings::VaultConfig;
use crate::utils::constants::{
    DEFAULT_VAULT_ADDR, HEADER_VAULT_NAMESPACE, HEADER_VAULT_TOKEN, HEADER_VAULT_WRAP_TTL,
};
use crate::vault::client::{api_url, read_body};
use crate::vault::error::VaultError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: Option<AuthBlock>,
    wrap_info: Option<WrapInfo>,
}

#[derive(Debug, Deserialize)]
struct AuthBlock {
    client_token: String,
    #[serde(default)]
    lease_duration: u64,
    #[serde(default)]
    renewable: bool,
}

#[derive(Debug, Deserialize)]
struct WrapInfo {
    token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    data: LookupData,
}

#[derive(Debug, Deserialize)]
struct LookupData {
    #[serde(default)]
    ttl: u64,
    #[serde(default)]
    renewable: bool,
}

/// Login plumbing shared by every method: mount path, namespace and response wrapping.
///
/// Owns its own HTTP client; the login task never touches the caller's secret-store client.
#[derive(Debug, Clone)]
pub struct VaultLogin {
    http: Client,
    address: String,
    namespace: Option<String>,
    mount_path: String,
    wrap_ttl: Option<u64>,
}

impl VaultLogin {
    pub fn new(http: Client, vault: &VaultConfig, method: &MethodConfig) -> Self {
        Self {
            http,
            address: vault
                .address
                .clone()
                .unwrap_or_else(|| DEFAULT_VAULT_ADDR.to_owned()),
            namespace: vault.namespace.clone(),
            mount_path: method.mount_path(),
            wrap_ttl: method.wrap_ttl,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.http.request(method, api_url(&self.address, path));
        if let Some(namespace) = &self.namespace {
            request = request.header(HEADER_VAULT_NAMESPACE, namespace);
        }
        request
    }

    /// POST `<mount_path>/login` and return the issued token, unwrapping it when wrapping is on.
    pub async fn login(&self, body: Value) -> Result<AuthResponse> {
        let path = format!("{}/login", self.mount_path);
        let mut request = self.request(Method::POST, &path).json(&body);
        if let Some(ttl) = self.wrap_ttl {
            request = request.header(HEADER_VAULT_WRAP_TTL, format!("{}s", ttl));
        }

        let response = request.send().await.map_err(VaultError::from)?;
        let body = read_body(response).await?;
        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|err| VaultError::InvalidResponse(format!("login response: {}", err)))?;

        if self.wrap_ttl.is_some() {
            let wrap_info = parsed
                .wrap_info
                .ok_or_else(|| anyhow!("wrapping requested but response has no wrap_info"))?;
            debug!("login response wrapped, unwrapping");
            return self.unwrap(&wrap_info.token).await;
        }

        parsed
            .auth
            .map(AuthBlock::into_response)
            .ok_or_else(|| anyhow!("login response has no auth block"))
    }

    /// Exchange a wrapping token for the wrapped login response.
    pub async fn unwrap(&self, wrapping_token: &str) -> Result<AuthResponse> {
        let response = self
            .request(Method::POST, "sys/wrapping/unwrap")
            .header(HEADER_VAULT_TOKEN, wrapping_token)
            .json(&json!({}))
            .send()
            .await
            .map_err(VaultError::from)?;
        let body = read_body(response).await?;
        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|err| VaultError::InvalidResponse(format!("unwrap response: {}", err)))?;
        parsed
            .auth
            .map(AuthBlock::into_response)
            .ok_or_else(|| anyhow!("unwrapped response has no auth block"))
    }

    /// Describe an existing token as a login result.
    pub async fn lookup_self(&self, token: &str) -> Result<AuthResponse> {
        let response = self
            .request(Method::GET, "auth/token/lookup-self")
            .header(HEADER_VAULT_TOKEN, token)
            .send()
            .await
            .map_err(VaultError::from)?;
        let body = read_body(response).await?;
        let parsed: LookupResponse = serde_json::from_str(&body)
            .map_err(|err| VaultError::InvalidResponse(format!("token lookup: {}", err)))?;
        Ok(AuthResponse {
            client_token: token.to_owned(),
            lease_duration: parsed.data.ttl,
            renewable: parsed.data.renewable,
        })
    }
}

impl AuthBlock {
    fn into_response(self) -> AuthResponse {
        AuthResponse {
            client_token: self.client_token,
            lease_duration: self.lease_duration,
            renewable: self.renewable,
        }
    }
}
