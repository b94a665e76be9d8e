//! Shared constants and invariants

/// Environment variable holding the configuration file path.
pub const ENV_CONFIG_FILE: &str = "DOCKER_CREDS_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "/etc/docker-credential-vault-login/config.yaml";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

pub const ENV_VAULT_ADDR: &str = "VAULT_ADDR";
pub const ENV_VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
pub const DEFAULT_VAULT_ADDR: &str = "https://127.0.0.1:8200";

pub const HEADER_VAULT_TOKEN: &str = "X-Vault-Token";
pub const HEADER_VAULT_NAMESPACE: &str = "X-Vault-Namespace";
pub const HEADER_VAULT_WRAP_TTL: &str = "X-Vault-Wrap-TTL";

pub const DEFAULT_K8S_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

// Supported login methods
pub const METHOD_APPROLE: &str = "approle";
pub const METHOD_JWT: &str = "jwt";
pub const METHOD_KUBERNETES: &str = "kubernetes";
pub const METHOD_TOKEN: &str = "token";
