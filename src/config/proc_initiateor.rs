use std::env;

use crate::config::settings::LoggingConfig;
use crate::config::types::ServiceConfig;
use crate::utils::constants::{DEFAULT_VAULT_ADDR, ENV_VAULT_ADDR, ENV_VAULT_NAMESPACE};

pub fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::default());
    }

    // address: config -> VAULT_ADDR -> default
    if config.vault.address.is_none() {
        config.vault.address = Some(
            env::var(ENV_VAULT_ADDR)
                .ok()
                .filter(|addr| !addr.is_empty())
                .unwrap_or_else(|| DEFAULT_VAULT_ADDR.to_owned()),
        );
    }
    if config.vault.namespace.is_none() {
        config.vault.namespace = env::var(ENV_VAULT_NAMESPACE).ok().filter(|ns| !ns.is_empty());
    }

    config.secret = config.secret.map(|secret| secret.trim_matches('/').to_owned());

    config
}
