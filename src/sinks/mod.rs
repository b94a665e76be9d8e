//! Token sinks
//!
//! A sink durably stores the token issued by a fresh login so the next
//! invocation can reuse it.

use anyhow::Result;
use std::future::Future;

pub mod file;

use file::FileSink;

use crate::cache::token::CachedToken;
use crate::config::sinks::SinkConfig;

pub trait TokenSink: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn write(&self, token: &CachedToken) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub enum SinkKind {
    File(FileSink),
}

impl TokenSink for SinkKind {
    fn name(&self) -> &str {
        match self {
            SinkKind::File(s) => s.name(),
        }
    }

    async fn write(&self, token: &CachedToken) -> Result<()> {
        match self {
            SinkKind::File(s) => s.write(token).await,
        }
    }
}

/// Build every configured sink, failing on the first invalid one.
pub fn build_sinks(configs: &[SinkConfig]) -> Result<Vec<SinkKind>> {
    configs
        .iter()
        .map(|cfg| match cfg {
            SinkConfig::File(file_cfg) => FileSink::new(file_cfg).map(SinkKind::File),
        })
        .collect()
}
