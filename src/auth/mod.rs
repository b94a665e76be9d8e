//! Login methods
//!
//! Each method authenticates against Vault and returns a fresh token lease.
//! The configured method is resolved once into an `AuthMethodKind`.

use anyhow::Result;
use std::future::Future;

pub mod approle;
pub mod jwt;
pub mod kubernetes;
pub mod login;
pub mod token;

use approle::AppRoleMethod;
use jwt::JwtMethod;
use kubernetes::KubernetesMethod;
use token::TokenMethod;

use crate::cache::token::CachedToken;
use crate::config::auth::{MethodConfig, MethodKindConfig};
use crate::config::settings::VaultConfig;
use crate::vault::client::build_http_client;
use login::VaultLogin;

/// Token lease returned by a successful login.
#[derive(Clone)]
pub struct AuthResponse {
    pub client_token: String,
    pub lease_duration: u64,
    pub renewable: bool,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("client_token", &"<redacted>")
            .field("lease_duration", &self.lease_duration)
            .field("renewable", &self.renewable)
            .finish()
    }
}

impl AuthResponse {
    pub fn into_cached_token(self, auth_method: &str) -> CachedToken {
        CachedToken::from_lease(self.client_token, self.lease_duration, self.renewable, auth_method)
    }
}

pub trait AuthMethod: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn authenticate(&self) -> impl Future<Output = Result<AuthResponse>> + Send;
}

#[derive(Debug, Clone)]
pub enum AuthMethodKind {
    AppRole(AppRoleMethod),
    Jwt(JwtMethod),
    Kubernetes(KubernetesMethod),
    Token(TokenMethod),
}

impl AuthMethod for AuthMethodKind {
    fn name(&self) -> &str {
        match self {
            AuthMethodKind::AppRole(m) => m.name(),
            AuthMethodKind::Jwt(m) => m.name(),
            AuthMethodKind::Kubernetes(m) => m.name(),
            AuthMethodKind::Token(m) => m.name(),
        }
    }

    async fn authenticate(&self) -> Result<AuthResponse> {
        match self {
            AuthMethodKind::AppRole(m) => m.authenticate().await,
            AuthMethodKind::Jwt(m) => m.authenticate().await,
            AuthMethodKind::Kubernetes(m) => m.authenticate().await,
            AuthMethodKind::Token(m) => m.authenticate().await,
        }
    }
}

/// Resolve the configured method. Credentials are read lazily on each attempt.
pub fn build_method(vault: &VaultConfig, cfg: &MethodConfig) -> Result<AuthMethodKind> {
    let login = VaultLogin::new(build_http_client(vault)?, vault, cfg);
    let method = match &cfg.kind {
        MethodKindConfig::AppRole { role_id, secret_id } => AuthMethodKind::AppRole(
            AppRoleMethod::new(login, role_id.clone(), secret_id.clone()),
        ),
        MethodKindConfig::Jwt { role, jwt } => {
            AuthMethodKind::Jwt(JwtMethod::new(login, role.clone(), jwt.clone()))
        }
        MethodKindConfig::Kubernetes { role, token_path } => AuthMethodKind::Kubernetes(
            KubernetesMethod::new(login, role.clone(), token_path.clone()),
        ),
        MethodKindConfig::Token { token } => {
            AuthMethodKind::Token(TokenMethod::new(login, token.clone()))
        }
    };
    Ok(method)
}
