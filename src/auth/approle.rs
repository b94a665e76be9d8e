use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::auth::login::VaultLogin;
use crate::auth::AuthResponse;
use crate::config::auth::GenericValue;
use crate::utils::constants::METHOD_APPROLE;

#[derive(Debug, Clone)]
pub struct AppRoleMethod {
    login: VaultLogin,
    role_id: GenericValue,
    secret_id: Option<GenericValue>,
}

impl AppRoleMethod {
    pub fn new(login: VaultLogin, role_id: GenericValue, secret_id: Option<GenericValue>) -> Self {
        Self { login, role_id, secret_id }
    }

    pub fn name(&self) -> &str {
        METHOD_APPROLE
    }

    pub async fn authenticate(&self) -> Result<AuthResponse> {
        let mut body = Map::new();
        body.insert(
            "role_id".into(),
            Value::String(self.role_id.resolve().await.context("approle role_id")?),
        );
        // secret_id is optional when the role has bind_secret_id=false
        if let Some(secret_id) = &self.secret_id {
            body.insert(
                "secret_id".into(),
                Value::String(secret_id.resolve().await.context("approle secret_id")?),
            );
        }
        self.login.login(Value::Object(body)).await
    }
}
