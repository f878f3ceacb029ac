//! Record ID generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Millisecond-timestamp IDs that never repeat within a process.
///
/// Each ID is `max(now_ms, previous + 1)`, so bursts inside one millisecond
/// still get distinct, increasing values. Once `u64::MAX` has been handed out
/// the generator is exhausted and yields `None`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    /// Generator whose first ID is greater than `last`.
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    pub fn next_id(&self) -> Option<u64> {
        self.next_at(chrono::Utc::now().timestamp_millis().max(0) as u64)
    }

    fn next_at(&self, now_ms: u64) -> Option<u64> {
        let mut previous = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now_ms.max(previous.checked_add(1)?);
            match self
                .last
                .compare_exchange(previous, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Some(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}
