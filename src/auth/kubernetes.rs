use anyhow::{Context, Result};
use serde_json::json;
use tokio::fs;

use crate::auth::login::VaultLogin;
use crate::auth::AuthResponse;
use crate::utils::constants::METHOD_KUBERNETES;

/// Logs in with the pod's service-account token.
#[derive(Debug, Clone)]
pub struct KubernetesMethod {
    login: VaultLogin,
    role: String,
    token_path: String,
}

impl KubernetesMethod {
    pub fn new(login: VaultLogin, role: String, token_path: String) -> Self {
        Self { login, role, token_path }
    }

    pub fn name(&self) -> &str {
        METHOD_KUBERNETES
    }

    pub async fn authenticate(&self) -> Result<AuthResponse> {
        let jwt = fs::read_to_string(&self.token_path)
            .await
            .with_context(|| format!("reading service account token {}", self.token_path))?;
        self.login
            .login(json!({ "role": self.role, "jwt": jwt.trim() }))
            .await
    }
}
