//! Catalog Proxy
//!
//! Serves GameSpot responses from the cache when fresh, otherwise fetches
//! them upstream and caches successful bodies.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::upstream::{build_url, QueryParams};

/// Upstream error bodies are cut to this many characters.
pub const MAX_ERROR_DETAIL_CHARS: usize = 500;

// == Catalog Proxy ==
/// Caching client for the GameSpot API.
#[derive(Debug)]
pub struct CatalogProxy {
    client: reqwest::Client,
    cache: Arc<RwLock<CacheStore>>,
    base_url: String,
    api_key: Option<String>,
    user_agent: String,
}

impl CatalogProxy {
    /// Creates a proxy from configuration, sharing `cache`.
    pub fn new(config: &Config, cache: Arc<RwLock<CacheStore>>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.upstream_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.upstream_timeout));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cache,
            base_url: config.gamespot_base_url.clone(),
            api_key: config
                .gamespot_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            user_agent: config.upstream_user_agent.clone(),
        })
    }

    /// Whether an upstream credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Shared response cache.
    pub fn cache(&self) -> &Arc<RwLock<CacheStore>> {
        &self.cache
    }

    /// Builds the outbound URL (and cache key) for a request.
    pub fn url_for(&self, resource: &str, params: &QueryParams) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(AppError::NotConfigured)?;
        build_url(&self.base_url, api_key, resource, params)
    }

    // == Fetch ==
    /// Returns the payload for `resource` with `params`.
    ///
    /// Fresh cache entries are returned without a network call. On a miss the
    /// upstream is queried; only successful, decodable bodies are cached.
    pub async fn fetch(&self, resource: &str, params: &QueryParams) -> Result<Value> {
        let url = self.url_for(resource, params)?;

        let cached = self.cache.write().await.get(&url);
        if let Some(value) = cached {
            debug!(resource, "serving from cache");
            return Ok(value);
        }

        debug!(resource, "cache miss, querying upstream");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!(resource, error = %e, "upstream request failed");
                AppError::Transport(format!("upstream request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details: String = body.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
            warn!(resource, status = status.as_u16(), "upstream returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let value: Value = response.json().await.map_err(|e| {
            let e = e.without_url();
            warn!(resource, error = %e, "upstream body is not valid JSON");
            AppError::Transport(format!("invalid upstream response: {}", e))
        })?;

        self.cache.write().await.put(url, value.clone());
        Ok(value)
    }
}
