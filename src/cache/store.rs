//! Cache Store Module
//!
//! Response cache keyed by the fully built upstream URL, with a single
//! process-wide TTL and lazy expiry on read.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, Clock, SystemClock};

// == Cache Store ==
/// Upstream response cache.
///
/// There is no capacity bound and no background sweep: an expired entry is
/// dropped the next time it is read, otherwise it stays until restart.
#[derive(Debug)]
pub struct CacheStore {
    /// URL -> cached payload
    entries: HashMap<String, CacheEntry>,
    /// TTL in seconds applied to every entry
    ttl: u64,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a CacheStore backed by the wall clock.
    ///
    /// # Arguments
    /// * `ttl` - TTL in seconds for every entry
    pub fn new(ttl: u64) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a CacheStore reading time from `clock`.
    pub fn with_clock(ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    // == Get ==
    /// Returns the cached payload for `key` if it is still fresh.
    ///
    /// Reading an expired entry removes it.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                // Keys embed the API credential; never log them.
                debug!(ttl_remaining_ms = entry.ttl_remaining_ms(now), "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                debug!("cache entry expired");
                None
            }
            None => None,
        }
    }

    // == Put ==
    /// Stores `value` under `key`, replacing any previous entry and resetting
    /// its expiry to now + TTL.
    pub fn put(&mut self, key: String, value: Value) {
        let entry = CacheEntry::new(value, self.clock.now_ms(), self.ttl);
        self.entries.insert(key, entry);
    }

    /// TTL in seconds applied to new entries.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }
}
