//! Per-IP rate limiting with a fixed-window counter.
//!
//! The middleware in `middleware::rate_limit` extracts client IPs and calls
//! `check()`; rejected requests surface as `RATE_LIMIT_EXCEEDED`.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// In-memory per-IP rate limiter with fixed-window counters.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    max_requests: u64,
    window: Duration,
    counters: DashMap<IpAddr, (u64, Instant)>,
}

impl RateLimiter {
    /// Creates a new rate limiter. `max_requests = 0` means disabled.
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                max_requests,
                window,
                counters: DashMap::new(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.max_requests > 0
    }

    pub fn max_requests(&self) -> u64 {
        self.inner.max_requests
    }

    /// Counts a request from `ip`.
    ///
    /// Returns `Err(retry_after)` with the time left in the current window
    /// when the limit is already reached.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut entry = self.inner.counters.entry(ip).or_insert((0, Instant::now()));
        let (count, window_start) = entry.value_mut();

        let elapsed = window_start.elapsed();
        if elapsed > self.inner.window {
            // Window expired — reset
            *count = 1;
            *window_start = Instant::now();
            Ok(())
        } else if *count < self.inner.max_requests {
            *count += 1;
            Ok(())
        } else {
            Err(self.inner.window.saturating_sub(elapsed))
        }
    }

    /// Removes entries for expired windows (background cleanup).
    pub fn cleanup(&self) -> usize {
        let window = self.inner.window;
        let before = self.inner.counters.len();
        self.inner
            .counters
            .retain(|_, (_, start)| start.elapsed() <= window);
        before.saturating_sub(self.inner.counters.len())
    }
}
