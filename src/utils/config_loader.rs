use std::path::Path;
use anyhow::{anyhow, Result};

use crate::config::proc_loader::file_to_config;
use crate::config::types::ServiceConfig;
use crate::utils::constants::{DEFAULT_CONFIG_FILE, ENV_CONFIG_FILE};

pub fn run(config_path: &str) -> Result<ServiceConfig> {
    let path = Path::new(config_path);
    file_to_config(path).map_err(|e| anyhow!("Invalid config {}: {:#}", config_path, e))
}

/// Config path from DOCKER_CREDS_CONFIG_FILE, or the default location.
pub fn config_path_from_env() -> String {
    std::env::var(ENV_CONFIG_FILE)
        .ok()
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned())
}
