//! Per-client rate limiting

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::error::ApiError;

#[derive(Debug, Clone)]
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

    fn try_take(&mut self, refill_per_second: f64, capacity: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_per_second).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token buckets keyed by client address. Capacity is twice the per-second rate.
///
/// The key is the socket peer address. Forwarded headers are honoured only
/// when `trust_forwarded` is set, i.e. behind a proxy that overwrites them.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, TokenBucket>>>,
    refill_per_second: f64,
    capacity: f64,
    trust_forwarded: bool,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        let rate = f64::from(requests_per_second.max(1));
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            refill_per_second: rate,
            capacity: rate * 2.0,
            trust_forwarded: false,
        }
    }

    pub fn trust_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    pub async fn check(&self, client: &str) -> bool {
        let mut buckets = self.buckets.write().await;

        buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity))
            .try_take(self.refill_per_second, self.capacity)
    }

    /// Drop buckets idle for longer than `max_age`
    pub async fn cleanup(&self, max_age: Duration) -> usize {
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();
        let now = Instant::now();

        buckets.retain(|_, bucket| now.duration_since(bucket.last_update) < max_age);
        before - buckets.len()
    }

    /// Run `cleanup` every `every` on a background task
    pub fn spawn_cleanup(&self, every: Duration, max_age: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = limiter.cleanup(max_age).await;
                if removed > 0 {
                    tracing::debug!(removed, "Pruned idle rate limit buckets");
                }
            }
        })
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request, limiter.trust_forwarded);

    if !limiter.check(&client).await {
        tracing::warn!(client = %client, "Rate limit exceeded");
        return ([(header::RETRY_AFTER, "1")], ApiError::TooManyRequests).into_response();
    }

    next.run(request).await
}

/// Bucket key: forwarded address when trusted, else the socket peer
pub(crate) fn client_key(request: &Request<Body>, trust_forwarded: bool) -> String {
    let forwarded = if trust_forwarded {
        forwarded_ip(request)
    } else {
        None
    };

    forwarded
        .or_else(|| peer_ip(request))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Peer address recorded by `into_make_service_with_connect_info`
pub(crate) fn peer_ip(request: &Request<Body>) -> Option<String> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// Client address claimed by proxy headers. Caller-controlled unless a proxy rewrites it.
pub(crate) fn forwarded_ip(request: &Request<Body>) -> Option<String> {
    let headers = request.headers();

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    forwarded.or_else(real_ip).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_burst_is_twice_the_rate() {
        let limiter = RateLimiter::new(5);

        for _ in 0..10 {
            assert!(limiter.check("203.0.113.7").await);
        }
        assert!(!limiter.check("203.0.113.7").await);
    }

    #[tokio::test]
    async fn test_clients_have_separate_buckets() {
        let limiter = RateLimiter::new(1);

        assert!(limiter.check("a").await);
        assert!(limiter.check("a").await);
        assert!(!limiter.check("a").await);
        assert!(limiter.check("b").await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_idle_buckets() {
        let limiter = RateLimiter::new(1);
        limiter.check("a").await;

        assert_eq!(limiter.cleanup(Duration::from_secs(60)).await, 0);
        assert_eq!(limiter.cleanup(Duration::ZERO).await, 1);
    }

    fn from_peer(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
        let addr: SocketAddr = peer.parse().unwrap();
        let mut builder = Request::builder().uri("/").extension(ConnectInfo(addr));
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_client_key_ignores_forwarded_headers_by_default() {
        let request = from_peer("192.0.2.10:51000", Some("198.51.100.1, 10.0.0.1"));
        assert_eq!(client_key(&request, false), "192.0.2.10");
        assert_eq!(client_key(&request, true), "198.51.100.1");

        let request = from_peer("192.0.2.10:51000", None);
        assert_eq!(client_key(&request, true), "192.0.2.10");

        let request = Request::builder()
            .header("x-real-ip", "10.0.0.9")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request, false), "unknown");
        assert_eq!(client_key(&request, true), "10.0.0.9");
    }

    #[tokio::test]
    async fn test_rotating_forwarded_header_shares_peer_bucket() {
        let limiter = RateLimiter::new(1);
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limiter.clone(), rate_limit));

        let mut allowed = 0;
        for i in 0..20 {
            let spoofed = format!("203.0.113.{}", i);
            let request = from_peer("192.0.2.10:51000", Some(&spoofed));
            let response = app.clone().oneshot(request).await.unwrap();
            if response.status() == StatusCode::OK {
                allowed += 1;
            }
        }
        // Burst of two, plus at most one refill while the loop runs
        assert!((2..=3).contains(&allowed), "{} requests allowed", allowed);

        // Another peer still has its own bucket
        let response = app
            .oneshot(from_peer("192.0.2.11:51000", Some("203.0.113.1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(limiter.buckets.read().await.len(), 2);
    }

    #[tokio::test]
    async fn test_middleware_rejects_with_retry_after() {
        let limiter = RateLimiter::new(1);
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limiter, rate_limit));

        let request = || Request::builder().uri("/").body(Body::empty()).unwrap();

        for _ in 0..2 {
            let response = app.clone().oneshot(request()).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "1");
    }
}
