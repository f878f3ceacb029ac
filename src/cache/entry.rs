//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde_json::Value;

// == Cache Entry ==
/// A decoded upstream response and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored upstream payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry created at `now_ms` that lives for `ttl_seconds`.
    pub fn new(value: Value, now_ms: u64, ttl_seconds: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Fresh ==
    /// An entry is fresh while `now <= expires_at`; the expiry instant itself
    /// still counts as fresh.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms <= self.expires_at
    }

    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}
