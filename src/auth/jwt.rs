use anyhow::{Context, Result};
use serde_json::json;

use crate::auth::login::VaultLogin;
use crate::auth::AuthResponse;
use crate::config::auth::GenericValue;
use crate::utils::constants::METHOD_JWT;

#[derive(Debug, Clone)]
pub struct JwtMethod {
    login: VaultLogin,
    role: String,
    jwt: GenericValue,
}

impl JwtMethod {
    pub fn new(login: VaultLogin, role: String, jwt: GenericValue) -> Self {
        Self { login, role, jwt }
    }

    pub fn name(&self) -> &str {
        METHOD_JWT
    }

    pub async fn authenticate(&self) -> Result<AuthResponse> {
        // re-read on every attempt, projected tokens rotate on disk
        let jwt = self.jwt.resolve().await.context("jwt")?;
        self.login
            .login(json!({ "role": self.role, "jwt": jwt }))
            .await
    }
}
