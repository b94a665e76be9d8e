//! Docker credential-helper protocol
//!
//! The helper is invoked as `docker-credential-vault-login <action>`, reads
//! its request from stdin and answers on stdout. Errors are written to
//! stdout as a plain message and the process exits with status 1.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::helper::{Helper, RetrievalOutcome};
use crate::vault::client::SecretStore;

/// Message docker matches on to treat a lookup as "no credentials".
pub const ERR_CREDENTIALS_NOT_FOUND: &str = "credentials not found in native keychain";
pub const ERR_MISSING_SERVER_URL: &str = "no credentials server URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Get,
    Store,
    Erase,
    List,
    Version,
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("credentials not found in native keychain")]
    NotFound,

    #[error("no credentials server URL")]
    MissingServerUrl,

    #[error("not implemented")]
    NotImplemented,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// `get` response body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialsResponse {
    #[serde(rename = "ServerURL")]
    pub server_url: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Secret")]
    pub secret: String,
}

/// Handle one protocol action.
pub async fn serve<C, R, W>(
    helper: &mut Helper<C>,
    action: Action,
    mut input: R,
    output: &mut W,
) -> Result<(), ProtocolError>
where
    C: SecretStore,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match action {
        Action::Get => {
            let mut request = String::new();
            input.read_to_string(&mut request).await?;
            let server_url = request.trim();
            if server_url.is_empty() {
                return Err(ProtocolError::MissingServerUrl);
            }

            match helper.get(server_url).await {
                RetrievalOutcome::Success(credentials) => {
                    let response = CredentialsResponse {
                        server_url: server_url.to_owned(),
                        username: credentials.username,
                        secret: credentials.password,
                    };
                    let body = serde_json::to_vec(&response)?;
                    output.write_all(&body).await?;
                    output.write_all(b"\n").await?;
                    output.flush().await?;
                    Ok(())
                }
                RetrievalOutcome::NotFound => Err(ProtocolError::NotFound),
            }
        }
        Action::Version => {
            let banner = format!(
                "Docker Credential Helper for Vault Storage v{}\n",
                env!("CARGO_PKG_VERSION")
            );
            output.write_all(banner.as_bytes()).await?;
            output.flush().await?;
            Ok(())
        }
        Action::Store | Action::Erase | Action::List => {
            warn!("action {:?} is not supported, credentials are managed in Vault", action);
            Err(ProtocolError::NotImplemented)
        }
    }
}
