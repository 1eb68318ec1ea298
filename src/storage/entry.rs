use bytes::Bytes;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. A clock set before 1970 reads as 0.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub value: Bytes,
    /// Absolute deadline in epoch milliseconds; `None` never expires.
    pub expires_at: Option<i64>,
}

impl Entry {
    pub fn new(value: Bytes) -> Self {
        Entry {
            value,
            expires_at: None,
        }
    }

    pub fn with_ttl(value: Bytes, ttl_millis: i64, now: i64) -> Self {
        Entry {
            value,
            expires_at: Some(now.saturating_add(ttl_millis)),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}
