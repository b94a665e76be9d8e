use serde::{Deserialize, Serialize};

use crate::helpers::time::{now_i64, unix_ts_in};

/// Renewal is attempted only inside this window before expiration.
pub const GRACE_PERIOD_SECONDS: i64 = 600; // 10 minutes

/// A Vault token as persisted by a sink.
#[derive(Clone, Serialize, Deserialize)]
pub struct CachedToken {
    /// Vault token. Never logged.
    pub token: String,
    /// UNIX TIMESTAMP after which the token is invalid
    pub expiration: i64,
    #[serde(default)]
    pub renewable: bool,
    /// Login method that issued the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<String>,
}

impl CachedToken {
    pub fn new(token: String, expiration: i64, renewable: bool) -> Self {
        Self { token, expiration, renewable, auth_method: None }
    }

    /// Build a record from a login lease, expiring `lease_duration` seconds from now.
    /// A zero lease (root or non-expiring token) never expires.
    pub fn from_lease(token: String, lease_duration: u64, renewable: bool, auth_method: &str) -> Self {
        let expiration = match lease_duration {
            0 => i64::MAX,
            ttl => unix_ts_in(ttl),
        };
        Self {
            token,
            expiration,
            renewable,
            auth_method: Some(auth_method.to_owned()),
        }
    }

    pub fn expired(&self) -> bool {
        self.expired_at(now_i64())
    }

    pub fn expired_at(&self, now: i64) -> bool {
        now >= self.expiration
    }

    pub fn eligible_for_renewal(&self) -> bool {
        self.eligible_for_renewal_at(now_i64())
    }

    /// Renewable and `now` inside `[expiration - GRACE_PERIOD_SECONDS, expiration)`.
    pub fn eligible_for_renewal_at(&self, now: i64) -> bool {
        let window_start = self.expiration.saturating_sub(GRACE_PERIOD_SECONDS);
        self.renewable && window_start <= now && now < self.expiration
    }
}

impl PartialEq for CachedToken {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
            && self.expiration == other.expiration
            && self.renewable == other.renewable
    }
}

impl Eq for CachedToken {}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expiration", &self.expiration)
            .field("renewable", &self.renewable)
            .field("auth_method", &self.auth_method)
            .finish()
    }
}
