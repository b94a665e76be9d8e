use crate::helper::error::HelperError;
use crate::vault::client::SecretStore;
use crate::vault::secret::Credentials;

/// Read `secret` with the client's active token and extract the registry credentials.
pub async fn exchange<C: SecretStore>(client: &C, secret: &str) -> Result<Credentials, HelperError> {
    let payload = client
        .read_secret(secret)
        .await
        .map_err(|error| HelperError::Exchange { path: secret.to_owned(), error })?;
    Credentials::from_payload(&payload)
        .map_err(|error| HelperError::Exchange { path: secret.to_owned(), error })
}
