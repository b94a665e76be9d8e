use serde::Deserialize;

use crate::config::auth::AutoAuthConfig;
use crate::config::settings::{SettingsConfig, VaultConfig};

/// ================================
/// Full helper configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    /// Vault path holding the registry `username` and `password`.
    pub secret: Option<String>,
    pub auto_auth: Option<AutoAuthConfig>,
}
