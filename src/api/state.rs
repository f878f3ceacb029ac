//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::RwLock;

use crate::api::IpRateLimiter;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::db::JsonStore;
use crate::upstream::CatalogProxy;

/// Everything a handler needs, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Caching GameSpot client
    pub catalog: Arc<CatalogProxy>,
    /// Flat-file datastore
    pub store: Arc<JsonStore>,
    /// Per-IP limiter for `/api/*`
    pub limiter: Arc<IpRateLimiter>,
}

impl AppState {
    /// Creates a new AppState from already built components.
    pub fn new(catalog: CatalogProxy, store: JsonStore, limiter: IpRateLimiter) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
            limiter: Arc::new(limiter),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens (or creates) the datastore and builds the upstream client with a
    /// wall-clock cache.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(RwLock::new(CacheStore::new(config.cache_ttl)));
        let catalog =
            CatalogProxy::new(config, cache).context("failed to initialise catalog proxy")?;
        let store = JsonStore::open(&config.db_path)
            .await
            .with_context(|| format!("failed to open datastore {}", config.db_path.display()))?;
        let limiter = IpRateLimiter::per_minute(config.rate_limit_per_minute);

        Ok(Self::new(catalog, store, limiter))
    }
}
