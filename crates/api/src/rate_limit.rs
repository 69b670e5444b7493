//! Login rate limiting.
//!
//! A token bucket per client key: each bucket holds up to `capacity` tokens
//! and refills continuously at `refill_per_min`. A login attempt spends one
//! token; an empty bucket rejects the attempt. Buckets that have refilled to
//! capacity carry no state and are dropped.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tokio::sync::Mutex;

use crate::state::AppState;

/// Key used when neither a trusted forwarded address nor the peer is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub capacity: f64,
    pub refill_per_min: f64,
    /// Key clients by the first `X-Forwarded-For` entry. Only safe behind a
    /// reverse proxy that overwrites the header.
    pub trust_proxy: bool,
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn refilled(&self, now: Instant, config: &RateLimitConfig) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        (self.tokens + elapsed * config.refill_per_min / 60.0).min(config.capacity)
    }
}

pub struct LoginRateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl LoginRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn trusts_proxy(&self) -> bool {
        self.config.trust_proxy
    }

    /// Spend one token for `key`. Returns `false` when the bucket is empty.
    pub async fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now()).await
    }

    async fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().await;
        buckets.retain(|k, b| k == key || b.refilled(now, &self.config) < self.config.capacity);

        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.config.capacity,
            last_refill: now,
        });
        bucket.tokens = bucket.refilled(now, &self.config);
        bucket.last_refill = now;
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Number of clients currently holding a partly spent bucket.
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Seconds until the next token for an empty bucket.
    pub fn retry_after_secs(&self) -> u64 {
        if self.config.refill_per_min <= 0.0 {
            return 60;
        }
        (60.0 / self.config.refill_per_min).ceil() as u64
    }
}

/// Rate-limit key for a request.
///
/// With `trust_proxy` the first `X-Forwarded-For` entry wins; otherwise the
/// header is ignored and the peer address is used. Falls back to
/// [`UNKNOWN_CLIENT`].
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> String {
    let forwarded = trust_proxy
        .then(|| headers.get("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    forwarded
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Extractor wrapping [`client_key`] with the limiter's proxy setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl FromRequestParts<AppState> for ClientKey {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientKey(client_key(
            &parts.headers,
            peer,
            state.login_limiter.trusts_proxy(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;

    fn limiter() -> LoginRateLimiter {
        LoginRateLimiter::new(RateLimitConfig {
            capacity: 5.0,
            refill_per_min: 5.0,
            trust_proxy: false,
        })
    }

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[tokio::test]
    async fn bucket_empties_after_capacity() {
        let limiter = limiter();
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.allow_at("1.2.3.4", now).await);
        }
        assert!(!limiter.allow_at("1.2.3.4", now).await);
        assert!(limiter.allow_at("5.6.7.8", now).await, "keys are independent");
    }

    #[tokio::test]
    async fn bucket_refills_over_time() {
        let limiter = limiter();
        let now = Instant::now();
        for _ in 0..5 {
            limiter.allow_at("k", now).await;
        }
        assert!(!limiter.allow_at("k", now).await);
        assert!(limiter.allow_at("k", now + Duration::from_secs(12)).await);
    }

    #[tokio::test]
    async fn refilled_buckets_are_dropped() {
        let limiter = limiter();
        let now = Instant::now();
        for i in 0..100 {
            limiter.allow_at(&format!("10.0.0.{i}"), now).await;
        }
        assert_eq!(limiter.tracked_clients().await, 100);

        // One token each: a single refill interval restores them all.
        limiter.allow_at("fresh", now + Duration::from_secs(12)).await;
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[tokio::test]
    async fn exhausted_bucket_survives_pruning() {
        let limiter = limiter();
        let now = Instant::now();
        for _ in 0..6 {
            limiter.allow_at("attacker", now).await;
        }
        limiter.allow_at("other", now + Duration::from_secs(1)).await;

        assert_eq!(limiter.tracked_clients().await, 2);
        assert!(!limiter.allow_at("attacker", now + Duration::from_secs(2)).await);
    }

    #[test]
    fn retry_after_matches_refill_rate() {
        assert_eq!(limiter().retry_after_secs(), 12);
    }

    #[test]
    fn forwarded_for_is_ignored_unless_trusted() {
        let peer: IpAddr = "192.0.2.10".parse().unwrap();
        let headers = forwarded("203.0.113.7, 10.0.0.1");

        assert_eq!(client_key(&headers, Some(peer), false), "192.0.2.10");
        assert_eq!(client_key(&headers, None, false), UNKNOWN_CLIENT);
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");
    }

    #[test]
    fn blank_forwarded_for_falls_back_to_peer() {
        let peer: IpAddr = "192.0.2.10".parse().unwrap();
        assert_eq!(client_key(&forwarded(" "), Some(peer), true), "192.0.2.10");
        assert_eq!(client_key(&HeaderMap::new(), None, true), UNKNOWN_CLIENT);
    }
}
