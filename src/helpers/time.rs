use chrono::Utc;
use tokio::time::Instant;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Unix timestamp `seconds` from now, saturating on overflow.
pub fn unix_ts_in(seconds: u64) -> i64 {
    now_i64().saturating_add(i64::try_from(seconds).unwrap_or(i64::MAX))
}
