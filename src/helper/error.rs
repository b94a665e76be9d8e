use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while retrieving credentials.
///
/// None of these reach the caller; they are logged and reported as "not found".
#[derive(Error, Debug)]
pub enum HelperError {
    #[error("configuration: {0}")]
    Configuration(String),

    #[error("reading cached token from sink '{sink}': {error:#}")]
    CacheRead { sink: String, error: anyhow::Error },

    #[error("renewing cached token: {0:#}")]
    Renewal(anyhow::Error),

    #[error("reading secret '{path}': {error:#}")]
    Exchange { path: String, error: anyhow::Error },

    #[error("login with method '{method}': {error:#}")]
    Login { method: String, error: anyhow::Error },

    #[error("persisting token: {0:#}")]
    Persist(anyhow::Error),

    #[error("failed to {phase} within deadline ({timeout:?})")]
    DeadlineExceeded { phase: &'static str, timeout: Duration },
}
