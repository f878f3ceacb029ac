//! Per-client rate limiting for `/api/*`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::error::{AppError, Result};

/// Fixed per-minute quota keyed by client IP.
pub struct IpRateLimiter {
    limiter: RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
}

impl IpRateLimiter {
    /// Allows `requests` per minute per IP. Zero is treated as one.
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Consumes one request for `ip`.
    pub fn check(&self, ip: IpAddr) -> Result<()> {
        self.limiter.check_key(&ip).map_err(|_| AppError::RateLimited)
    }

    /// Forgets clients whose quota has fully replenished. Returns how many
    /// clients are still tracked.
    pub fn prune(&self) -> usize {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        self.limiter.len()
    }

    /// Number of client IPs currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Spawns a background task that prunes idle clients from `limiter` every
/// `interval`. Abort the returned handle on shutdown.
pub fn spawn_pruning_task(limiter: Arc<IpRateLimiter>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting rate limiter pruning every {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let before = limiter.tracked_clients();
            let after = limiter.prune();
            debug!(before, after, "rate limiter pruned");
        }
    })
}

impl std::fmt::Debug for IpRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpRateLimiter").finish_non_exhaustive()
    }
}

/// Rejects requests over the per-IP quota with 429.
///
/// Requests without connection info (in-process tests) count as loopback.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if let Err(e) = state.limiter.check(ip) {
        warn!(%ip, uri = %request.uri(), "rate limit exceeded");
        return Err(e);
    }

    Ok(next.run(request).await)
}
