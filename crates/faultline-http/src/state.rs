//! HTTP application state.
//!
//! Holds the transport-side collaborators that raise taxonomy errors
//! (rate limiter, bearer auth) plus boundary settings like CORS origins and
//! the request timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::AuthProvider;
use crate::cors::CorsOrigins;
use crate::rate_limit::RateLimiter;

/// Configuration subset relevant to the HTTP layer.
///
/// Bind address and logging stay in the binary crate's `Config`.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Parsed before startup; see [`CorsOrigins::parse`].
    pub cors_origins: CorsOrigins,
    /// Zero disables the timeout.
    pub request_timeout: Duration,
    /// Max requests per IP per window. Zero disables rate limiting.
    pub rate_limit: u64,
    pub rate_limit_window: Duration,
    /// Key rate limiting on `X-Forwarded-For` instead of the peer address.
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    pub auth_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origins: CorsOrigins::Deny,
            request_timeout: Duration::from_secs(30),
            rate_limit: 0,
            rate_limit_window: Duration::from_secs(60),
            trust_forwarded_for: false,
            auth_token: None,
        }
    }
}

/// Shared HTTP application state, cloneable across handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppInner>,
}

struct AppInner {
    rate_limiter: RateLimiter,
    auth: Option<AuthProvider>,
    cors_origins: CorsOrigins,
    trust_forwarded_for: bool,
    request_timeout: Duration,
    start_time: Instant,
}

impl AppState {
    /// Creates a new HTTP application state.
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            inner: Arc::new(AppInner {
                rate_limiter: RateLimiter::new(config.rate_limit, config.rate_limit_window),
                auth: AuthProvider::new(config.auth_token.clone()),
                cors_origins: config.cors_origins.clone(),
                trust_forwarded_for: config.trust_forwarded_for,
                request_timeout: config.request_timeout,
                start_time: Instant::now(),
            }),
        }
    }

    // --- Accessors ---

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.rate_limiter
    }

    pub fn auth(&self) -> Option<&AuthProvider> {
        self.inner.auth.as_ref()
    }

    pub fn cors_origins(&self) -> &CorsOrigins {
        &self.inner.cors_origins
    }

    pub fn trust_forwarded_for(&self) -> bool {
        self.inner.trust_forwarded_for
    }

    pub fn request_timeout(&self) -> Duration {
        self.inner.request_timeout
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }

    // --- Maintenance ---

    /// Clean up expired rate limiter windows. Returns count removed.
    pub fn cleanup_rate_limits(&self) -> usize {
        self.inner.rate_limiter.cleanup()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}
