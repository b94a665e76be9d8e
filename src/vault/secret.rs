use anyhow::{anyhow, Result};
use serde_json::Value;

/// Registry credentials read from Vault.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Extract `username` and `password` from a secret's `data` block.
    ///
    /// Accepts both KV v1 (`{"username": ..}`) and KV v2
    /// (`{"data": {"username": ..}, "metadata": {..}}`) layouts.
    pub fn from_payload(data: &Value) -> Result<Self> {
        let fields = match data.get("data") {
            Some(inner) if inner.is_object() && data.get("metadata").is_some() => inner,
            _ => data,
        };

        let username = string_field(fields, "username")?;
        let password = string_field(fields, "password")?;
        Ok(Self { username, password })
    }
}

fn string_field(fields: &Value, key: &str) -> Result<String> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.to_owned()),
        Some(_) => Err(anyhow!("secret field '{}' is not a string", key)),
        None => Err(anyhow!("secret has no '{}' field", key)),
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
