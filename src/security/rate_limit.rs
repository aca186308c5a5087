//! Per-client rate limiting middleware.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Shared limiter state, one bucket per client key.
///
/// A bucket untouched for `idle_ttl` has refilled completely, so it is
/// dropped and recreated on the client's next request. Sweeps run from
/// `check` at most once per `idle_ttl`.
pub struct RateLimiterState {
    buckets: DashMap<String, TokenBucket>,
    rps: f64,
    burst: f64,
    idle_ttl: Duration,
    last_sweep: Mutex<Instant>,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        let rps = config.requests_per_second as f64;
        let burst = config.burst_size as f64;
        let idle_ttl =
            Duration::try_from_secs_f64(burst / rps).unwrap_or(Duration::from_secs(60));

        Self {
            buckets: DashMap::new(),
            rps,
            burst,
            idle_ttl,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Take one token for `key`. Returns false when the bucket is empty.
    pub fn check(&self, key: &str) -> bool {
        self.maybe_sweep();

        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst));
        bucket.try_acquire(self.burst, self.rps)
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Drop every bucket idle for at least `idle_ttl`. Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let before = self.buckets.len();
        let ttl = self.idle_ttl;
        self.buckets.retain(|_, bucket| bucket.last_update.elapsed() < ttl);
        before.saturating_sub(self.buckets.len())
    }

    // Must run before `check` takes its entry guard: retain locks every shard.
    fn maybe_sweep(&self) {
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if last_sweep.elapsed() < self.idle_ttl {
            return;
        }
        *last_sweep = Instant::now();
        drop(last_sweep);

        let evicted = self.evict_idle();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.buckets.len(), "Evicted idle rate limit buckets");
        }
    }
}

/// Middleware function keyed on the peer IP.
///
/// Requests without connection info (in-process test clients) share one
/// bucket.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if state.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        metrics::record_rate_limited();
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Rate limit exceeded" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(rps: u32, burst: u32) -> RateLimiterState {
        RateLimiterState::new(&RateLimitConfig {
            enabled: true,
            requests_per_second: rps,
            burst_size: burst,
        })
    }

    #[test]
    fn test_burst_then_reject() {
        let state = limiter(1, 3);
        assert!(state.check("10.0.0.1"));
        assert!(state.check("10.0.0.1"));
        assert!(state.check("10.0.0.1"));
        assert!(!state.check("10.0.0.1"));
    }

    #[test]
    fn test_clients_have_separate_buckets() {
        let state = limiter(1, 1);
        assert!(state.check("10.0.0.1"));
        assert!(!state.check("10.0.0.1"));
        assert!(state.check("10.0.0.2"));
        assert_eq!(state.tracked_clients(), 2);
    }

    #[test]
    fn test_idle_ttl_is_full_refill_time() {
        assert_eq!(limiter(10, 20).idle_ttl, Duration::from_secs(2));
        assert_eq!(limiter(1000, 1).idle_ttl, Duration::from_millis(1));
    }

    #[test]
    fn test_idle_clients_are_evicted() {
        let state = limiter(10, 2);
        for i in 0..5_000 {
            state.check(&format!("10.1.{}.{}", i / 256, i % 256));
        }
        assert_eq!(state.tracked_clients(), 5_000);

        std::thread::sleep(Duration::from_millis(250));

        // The next request sweeps everything that went idle.
        assert!(state.check("10.9.9.9"));
        assert_eq!(state.tracked_clients(), 1);
    }

    #[test]
    fn test_active_clients_survive_eviction() {
        let state = limiter(1, 5);
        assert!(state.check("10.0.0.1"));
        assert!(state.check("10.0.0.2"));

        assert_eq!(state.evict_idle(), 0);
        assert_eq!(state.tracked_clients(), 2);

        // Bucket state is kept, not reset.
        for _ in 0..4 {
            assert!(state.check("10.0.0.1"));
        }
        assert!(!state.check("10.0.0.1"));
    }

    #[test]
    fn test_refill() {
        let mut bucket = TokenBucket::new(1.0);
        assert!(bucket.try_acquire(1.0, 1000.0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(bucket.try_acquire(1.0, 1000.0));
    }
}
