use anyhow::{Context, Result};

use crate::auth::login::VaultLogin;
use crate::auth::AuthResponse;
use crate::config::auth::GenericValue;
use crate::utils::constants::METHOD_TOKEN;

/// Uses a pre-issued token; the lease is taken from `lookup-self`.
#[derive(Debug, Clone)]
pub struct TokenMethod {
    login: VaultLogin,
    token: GenericValue,
}

impl TokenMethod {
    pub fn new(login: VaultLogin, token: GenericValue) -> Self {
        Self { login, token }
    }

    pub fn name(&self) -> &str {
        METHOD_TOKEN
    }

    pub async fn authenticate(&self) -> Result<AuthResponse> {
        let token = self.token.resolve().await.context("token")?;
        self.login.lookup_self(&token).await
    }
}
