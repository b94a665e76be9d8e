use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use crate::cache::token::CachedToken;
use crate::helper::error::HelperError;
use crate::config::sinks::{SinkConfig, TokenFormat};
use crate::sinks::file::FileSink;
use crate::vault::client::SecretStore;

/// Read every cached token from the configured sinks, in sink order.
///
/// Empty, unreadable or malformed sinks are logged and skipped; so are
/// tokens that already expired. An empty result is not an error.
pub async fn get_cached_tokens<C: SecretStore>(sinks: &[SinkConfig], client: &C) -> Vec<CachedToken> {
    let mut tokens = Vec::with_capacity(sinks.len());
    for sink in sinks {
        let name = sink.name();
        match read_sink(sink, client).await {
            Ok(Some(token)) if token.expired() => {
                debug!("sink '{}': cached token expired at {}, skipping", name, token.expiration);
            }
            Ok(Some(token)) => {
                info!("sink '{}': cached token found", name);
                tokens.push(token);
            }
            Ok(None) => debug!("sink '{}': empty", name),
            Err(error) => warn!("{}", HelperError::CacheRead { sink: name, error }),
        }
    }
    tokens
}

async fn read_sink<C: SecretStore>(sink: &SinkConfig, client: &C) -> Result<Option<CachedToken>> {
    match sink {
        SinkConfig::File(cfg) => {
            let file = FileSink::new(cfg)?;
            let Some(content) = file.read().await? else {
                return Ok(None);
            };
            parse_token(&content, cfg.format, client).await.map(Some)
        }
    }
}

/// JSON sinks hold a full record; raw sinks (or anything that is not JSON)
/// hold a bare token whose lease is looked up in Vault.
async fn parse_token<C: SecretStore>(content: &str, format: TokenFormat, client: &C) -> Result<CachedToken> {
    let content = content.trim();
    if format == TokenFormat::Json && content.starts_with('{') {
        return serde_json::from_str::<CachedToken>(content)
            .map_err(|err| anyhow!("malformed cached token: {}", err));
    }
    if content.contains(char::is_whitespace) {
        return Err(anyhow!("malformed cached token: unexpected whitespace"));
    }
    let lookup = client.lookup_self(content).await?;
    Ok(lookup.into_cached_token(content.to_owned()))
}
