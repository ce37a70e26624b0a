use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tracing::warn;

use crate::utils::error::GrvtError;

/// GRVT allows 200 requests per 10 seconds per account.
pub const GRVT_MAX_REQUESTS: u32 = 200;
pub const GRVT_RATE_WINDOW: Duration = Duration::from_secs(10);

/// Client-side request pacing. The whole quota is available as a burst and
/// refills evenly over the window.
pub struct RequestLimiter {
    inner: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    max_requests: u32,
    window: Duration,
}

impl RequestLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, GrvtError> {
        let burst = NonZeroU32::new(max_requests)
            .ok_or_else(|| GrvtError::RateLimit("max_requests must be positive".to_string()))?;
        let quota = Quota::with_period(window / max_requests)
            .ok_or_else(|| GrvtError::RateLimit(format!("window {:?} is too short", window)))?
            .allow_burst(burst);

        Ok(Self {
            inner: RateLimiter::direct(quota),
            max_requests,
            window,
        })
    }

    /// Take a permit if one is free right now.
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }

    /// Wait until a permit is free, then take it.
    pub async fn acquire(&self) {
        if self.inner.check().is_ok() {
            return;
        }

        let started = Instant::now();
        warn!(
            "⏳ Rate limit reached ({} requests / {:?}), waiting for a permit",
            self.max_requests, self.window
        );
        self.inner.until_ready().await;
        warn!("Permit granted after {:?}", started.elapsed());
    }
}
