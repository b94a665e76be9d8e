use serde::Deserialize;

/// One configured token sink, selected by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    File(FileSinkConfig),
}

impl SinkConfig {
    /// Human readable sink id used in logs.
    pub fn name(&self) -> String {
        match self {
            SinkConfig::File(cfg) => format!("file:{}", cfg.path),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSinkConfig {
    /// Absolute filesystem path of the token file.
    pub path: String,
    #[serde(default)]
    pub format: TokenFormat,
    /// Unix permission bits applied to the written file.
    #[serde(default = "default_file_mode")]
    pub mode: u32,
}

/// How a token is laid out inside a sink.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenFormat {
    /// serialized CachedToken (token, expiration, renewable)
    #[default]
    Json,
    /// bare token string, as written by `vault agent` file sinks
    Raw,
}

fn default_file_mode() -> u32 {
    0o600
}
