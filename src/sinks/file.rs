use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::cache::token::CachedToken;
use crate::config::sinks::{FileSinkConfig, TokenFormat};

/// File sink for the Vault token
#[derive(Debug, Clone)]
pub struct FileSink {
    pub name: String,
    pub path: PathBuf,
    pub format: TokenFormat,
    pub mode: u32,
}

impl FileSink {
    pub fn new(cfg: &FileSinkConfig) -> Result<Self> {
        let path = PathBuf::from(&cfg.path);
        if !path.is_absolute() {
            return Err(anyhow!("file sink path '{}' must be absolute", cfg.path));
        }
        if path.file_name().is_none() {
            return Err(anyhow!("file sink path '{}' has no file name", cfg.path));
        }
        Ok(Self {
            name: format!("file:{}", cfg.path),
            path,
            format: cfg.format,
            mode: cfg.mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write the token atomically: tmp file with final permissions, then rename.
    pub async fn write(&self, token: &CachedToken) -> Result<()> {
        let content = match self.format {
            TokenFormat::Json => serde_json::to_string(token).context("serializing token")?,
            TokenFormat::Raw => token.token.clone(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }

        let tmp = tmp_path(&self.path);
        fs::write(&tmp, content.as_bytes())
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        set_permissions(&tmp, self.mode).await?;
        if let Err(err) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(err).with_context(|| format!("renaming into {}", self.path.display()));
        }

        info!("sink '{}': token written", self.name);
        Ok(())
    }

    /// Current file content, `None` when the file is absent or blank.
    pub async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("sink '{}': no token file yet", self.name);
                Ok(None)
            }
            Err(err) => Err(err).with_context(|| format!("reading {}", self.path.display())),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
async fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .with_context(|| format!("setting permissions on {}", path.display()))
}

#[cfg(not(unix))]
async fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
