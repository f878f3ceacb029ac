//! Cache Module
//!
//! In-memory TTL cache for upstream catalog responses.

mod clock;
mod entry;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use store::CacheStore;
