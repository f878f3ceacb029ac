//! Upstream Module
//!
//! Outbound access to the GameSpot catalog API: URL construction and the
//! caching proxy.

mod proxy;
mod query;

pub use self::proxy::{CatalogProxy, MAX_ERROR_DETAIL_CHARS};
pub use self::query::{build_url, QueryParams};
