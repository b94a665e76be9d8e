//! Credential retrieval
//!
//! `Helper::get` first tries the tokens cached in the configured sinks and
//! falls back to a fresh login. Every failure is logged and reported as
//! `RetrievalOutcome::NotFound`.

pub mod cached;
pub mod error;
pub mod exchange;
pub mod fresh;

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::auth::{build_method, AuthMethod};
use crate::cache::reader::get_cached_tokens;
use crate::config::types::ServiceConfig;
use crate::resilience::retry::RetrySettings;
use crate::sinks::{build_sinks, TokenSink};
use crate::utils::config_loader;
use crate::vault::client::{SecretStore, VaultClient};
use crate::vault::secret::Credentials;
use cached::try_cached_tokens;
use error::HelperError;
use fresh::fresh_login;

/// The only answer a credential lookup ever gives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    Success(Credentials),
    NotFound,
}

#[derive(Debug)]
pub struct HelperOptions<C> {
    /// Secret-store client; built from the `vault` config block when absent.
    pub client: Option<C>,
    /// Already loaded configuration; skips reading `config_path`.
    pub config: Option<ServiceConfig>,
    /// Config file; DOCKER_CREDS_CONFIG_FILE or the default path when absent.
    pub config_path: Option<String>,
}

impl<C> Default for HelperOptions<C> {
    fn default() -> Self {
        Self { client: None, config: None, config_path: None }
    }
}

pub struct Helper<C: SecretStore = VaultClient> {
    client: Option<C>,
    config: Option<ServiceConfig>,
    config_path: Option<String>,
}

impl<C: SecretStore> Helper<C> {
    pub fn new(opts: HelperOptions<C>) -> Self {
        Self { client: opts.client, config: opts.config, config_path: opts.config_path }
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    /// Look up registry credentials. `server_url` is only logged: one
    /// configured secret serves every registry.
    pub async fn get(&mut self, server_url: &str) -> RetrievalOutcome {
        if let Some(config) = self.config.take() {
            let outcome = self.get_with_config(server_url, &config).await;
            self.config = Some(config);
            return outcome;
        }

        let config_path = self
            .config_path
            .clone()
            .unwrap_or_else(config_loader::config_path_from_env);

        let config = match config_loader::run(&config_path) {
            Ok(config) => config,
            Err(err) => {
                error!("{}", HelperError::Configuration(format!("{:#}", err)));
                return RetrievalOutcome::NotFound;
            }
        };
        self.get_with_config(server_url, &config).await
    }

    /// Same as `get` with an already loaded configuration.
    pub async fn get_with_config(&mut self, server_url: &str, config: &ServiceConfig) -> RetrievalOutcome {
        self.retrieve_with(server_url, config, |config| {
            let auto_auth = config
                .auto_auth
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("no auto_auth block"))?;
            let sinks = build_sinks(&auto_auth.sinks)?;
            let method = build_method(&config.vault, &auto_auth.method)?;
            Ok((method, sinks))
        })
        .await
    }

    /// Run the retrieval; `build` constructs the login method and sinks and is
    /// only called once every cached token failed.
    pub async fn retrieve_with<A, S, F>(&mut self, server_url: &str, config: &ServiceConfig, build: F) -> RetrievalOutcome
    where
        A: AuthMethod,
        S: TokenSink,
        F: FnOnce(&ServiceConfig) -> Result<(A, Vec<S>)>,
    {
        debug!("credentials requested for '{}'", server_url);
        match self.retrieve(config, build).await {
            Ok(credentials) => {
                info!("credentials found for '{}'", server_url);
                RetrievalOutcome::Success(credentials)
            }
            Err(err) => {
                error!("{}", err);
                RetrievalOutcome::NotFound
            }
        }
    }

    async fn retrieve<A, S, F>(&mut self, config: &ServiceConfig, build: F) -> Result<Credentials, HelperError>
    where
        A: AuthMethod,
        S: TokenSink,
        F: FnOnce(&ServiceConfig) -> Result<(A, Vec<S>)>,
    {
        let secret = config
            .secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| HelperError::Configuration("no 'secret' field found in configuration".to_owned()))?;
        let auto_auth = config
            .auto_auth
            .as_ref()
            .ok_or_else(|| HelperError::Configuration("no 'auto_auth' block found in configuration".to_owned()))?;

        if self.client.is_none() {
            let client = C::from_config(&config.vault)
                .map_err(|err| HelperError::Configuration(format!("creating Vault client: {:#}", err)))?;
            self.client = Some(client);
        }
        let Some(client) = self.client.as_mut() else {
            return Err(HelperError::Configuration("no Vault client".to_owned()));
        };

        let cached_tokens = get_cached_tokens(&auto_auth.sinks, &*client).await;
        debug!("{} cached token(s) found", cached_tokens.len());
        if let Some(credentials) =
            try_cached_tokens(client, secret, &cached_tokens, config.settings.renewal).await
        {
            return Ok(credentials);
        }

        info!("no usable cached token, re-authenticating");
        client.clear_token();

        let (method, sinks) = build(config)
            .map_err(|err| HelperError::Configuration(format!("building method and sinks: {:#}", err)))?;

        fresh_login(
            client,
            secret,
            method,
            sinks,
            Duration::from_secs(config.settings.timeout_seconds),
            RetrySettings::from_config(config.settings.retry.as_ref()),
        )
        .await
    }
}
