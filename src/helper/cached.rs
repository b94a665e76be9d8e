use tracing::{debug, info, warn};

use crate::cache::token::CachedToken;
use crate::config::settings::RenewalPolicy;
use crate::helper::error::HelperError;
use crate::helper::exchange::exchange;
use crate::vault::client::SecretStore;
use crate::vault::secret::Credentials;

/// Renew, then try every cached token in order. The first successful
/// exchange wins. Leaves no token active on the client when all fail.
pub async fn try_cached_tokens<C: SecretStore>(
    client: &mut C,
    secret: &str,
    tokens: &[CachedToken],
    renewal: RenewalPolicy,
) -> Option<Credentials> {
    for (idx, token) in tokens.iter().enumerate() {
        let renew = match renewal {
            RenewalPolicy::Always => true,
            RenewalPolicy::GracePeriod => token.eligible_for_renewal(),
        };
        if !renew {
            debug!("cached token #{}: outside renewal window", idx);
            continue;
        }
        // a token that cannot be renewed may still be good for reads
        if let Err(err) = client.renew_self(&token.token).await {
            warn!("cached token #{}: {}", idx, HelperError::Renewal(err));
        }
    }

    for (idx, token) in tokens.iter().enumerate() {
        client.set_token(&token.token);
        match exchange(client, secret).await {
            Ok(credentials) => {
                info!("cached token #{}: credentials read", idx);
                return Some(credentials);
            }
            Err(err) => warn!("cached token #{}: {}", idx, err),
        }
    }

    client.clear_token();
    None
}
