// tests/common/mod.rs
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use serde_json::{json, Value};
use tokio::time::sleep;

use crate::auth::{AuthMethod, AuthResponse};
use crate::cache::token::CachedToken;
use crate::config::proc_loader::parse_config;
use crate::config::settings::VaultConfig;
use crate::config::types::ServiceConfig;
use crate::sinks::TokenSink;
use crate::vault::client::{SecretStore, TokenLookup};

pub const SECRET_PATH: &str = "secret/data/docker/registry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Renew(String),
    Lookup(String),
    Read(String),
}

/// In-memory secret store: a token can read the secret iff it has a payload.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    pub secrets: HashMap<String, Value>,
    pub renewable: HashSet<String>,
    pub lookups: HashMap<String, TokenLookup>,
    pub calls: Arc<Mutex<Vec<StoreCall>>>,
    active: Option<String>,
}

impl MockStore {
    pub fn with_secret(mut self, token: &str, username: &str, password: &str) -> Self {
        self.secrets.insert(
            token.to_owned(),
            json!({ "data": { "username": username, "password": password }, "metadata": { "version": 1 } }),
        );
        self
    }

    pub fn with_renewable(mut self, token: &str) -> Self {
        self.renewable.insert(token.to_owned());
        self
    }

    pub fn with_lookup(mut self, token: &str, ttl: u64, renewable: bool) -> Self {
        self.lookups.insert(
            token.to_owned(),
            TokenLookup { ttl, renewable, expire_time: None },
        );
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Read(token) => Some(token),
                _ => None,
            })
            .collect()
    }

    pub fn renewals(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Renew(token) => Some(token),
                _ => None,
            })
            .collect()
    }

    pub fn active_token(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SecretStore for MockStore {
    fn from_config(_cfg: &VaultConfig) -> Result<Self> {
        Ok(Self::default())
    }

    fn set_token(&mut self, token: &str) {
        self.active = Some(token.to_owned());
    }

    fn clear_token(&mut self) {
        self.active = None;
    }

    async fn renew_self(&self, token: &str) -> Result<()> {
        self.record(StoreCall::Renew(token.to_owned()));
        if self.renewable.contains(token) {
            Ok(())
        } else {
            Err(anyhow!("token not renewable"))
        }
    }

    async fn lookup_self(&self, token: &str) -> Result<TokenLookup> {
        self.record(StoreCall::Lookup(token.to_owned()));
        self.lookups
            .get(token)
            .cloned()
            .ok_or_else(|| anyhow!("permission denied"))
    }

    async fn read_secret(&self, _path: &str) -> Result<Value> {
        let token = self.active.clone().ok_or_else(|| anyhow!("no token set"))?;
        self.record(StoreCall::Read(token.clone()));
        self.secrets
            .get(&token)
            .cloned()
            .ok_or_else(|| anyhow!("permission denied"))
    }
}

/// Sets its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Login method that answers after `delay`, or never when `delay` is None.
#[derive(Clone)]
pub struct MockMethod {
    pub token: String,
    pub delay: Option<Duration>,
    pub fail: bool,
    pub attempts: Arc<AtomicUsize>,
    /// set once no authenticate() future is alive anymore
    pub finished: Arc<AtomicBool>,
}

impl MockMethod {
    pub fn new(token: &str, delay: Option<Duration>) -> Self {
        Self {
            token: token.to_owned(),
            delay,
            fail: false,
            attempts: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new("unused", Some(Duration::ZERO)) }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl AuthMethod for MockMethod {
    fn name(&self) -> &str {
        "mock"
    }

    async fn authenticate(&self) -> Result<AuthResponse> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.finished.store(false, Ordering::SeqCst);
        let _flag = DropFlag(self.finished.clone());
        match self.delay {
            Some(delay) => sleep(delay).await,
            None => std::future::pending::<()>().await,
        }
        if self.fail {
            bail!("login rejected");
        }
        Ok(AuthResponse {
            client_token: self.token.clone(),
            lease_duration: 3600,
            renewable: true,
        })
    }
}

/// Sink that stores tokens in memory after `delay`.
#[derive(Clone)]
pub struct MockSink {
    pub name: String,
    pub delay: Duration,
    pub fail: bool,
    pub written: Arc<Mutex<Vec<CachedToken>>>,
}

impl MockSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            name: "mock-sink".to_owned(),
            delay,
            fail: false,
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn written(&self) -> Vec<CachedToken> {
        self.written.lock().unwrap().clone()
    }
}

impl TokenSink for MockSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&self, token: &CachedToken) -> Result<()> {
        sleep(self.delay).await;
        if self.fail {
            bail!("disk full");
        }
        self.written.lock().unwrap().push(token.clone());
        Ok(())
    }
}

/// Config with one json file sink at `sink_path` and a token login method.
pub fn config_with_file_sink(sink_path: &str, timeout_seconds: u64) -> ServiceConfig {
    let yaml = format!(
        r#"
settings:
  timeout_seconds: {timeout_seconds}
  retry:
    attempts: 1
vault:
  address: "http://127.0.0.1:1"
secret: {SECRET_PATH}
auto_auth:
  method:
    type: token
    token:
      from_env: VAULT_LOGIN_TEST_UNSET_TOKEN
  sinks:
    - type: file
      path: "{sink_path}"
"#
    );
    parse_config(yaml).expect("test config must be valid")
}

pub fn write_cached_token(path: &std::path::Path, token: &CachedToken) {
    std::fs::write(path, serde_json::to_string(token).unwrap()).expect("write token file");
}
