//! Leaky-bucket admission gate.
//!
//! Every admitted call adds one token to the bucket; tokens drain continuously
//! at `leak_rate_per_sec`. A call is admitted only while a whole token still
//! fits below `capacity`, so at most `capacity` calls pass back-to-back and the
//! sustained rate converges to the leak rate.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use probewire_types::{LimiterConfig, ProbewireError};
use tokio::time::Instant;

/// Token-bucket rate limiter with continuous fractional leak.
///
/// Time is read from [`tokio::time::Instant`], so a paused Tokio clock drives
/// the bucket deterministically in tests.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    leak_rate_per_sec: f64,
    bucket: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_leak: Instant,
}

impl Bucket {
    fn leak(&mut self, now: Instant, leak_rate_per_sec: f64) {
        // saturating: an earlier `now` never moves `last_leak` backward
        let elapsed = now.saturating_duration_since(self.last_leak);
        if elapsed.is_zero() {
            return;
        }
        let leaked = elapsed.as_secs_f64() * leak_rate_per_sec;
        self.tokens = (self.tokens - leaked).max(0.0);
        self.last_leak = now;
    }
}

impl RateLimiter {
    /// Create an empty bucket.
    ///
    /// # Errors
    /// Returns `ProbewireError::InvalidConfig` if the capacity is negative or
    /// the leak rate is not strictly positive.
    pub fn new(config: LimiterConfig) -> Result<Self, ProbewireError> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity,
            leak_rate_per_sec: config.leak_rate_per_sec,
            bucket: Mutex::new(Bucket {
                tokens: 0.0,
                last_leak: Instant::now(),
            }),
        })
    }

    /// Maximum number of tokens the bucket can hold.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Tokens drained per second.
    #[must_use]
    pub const fn leak_rate_per_sec(&self) -> f64 {
        self.leak_rate_per_sec
    }

    /// Configuration this limiter was built from.
    #[must_use]
    pub const fn config(&self) -> LimiterConfig {
        LimiterConfig::new(self.capacity, self.leak_rate_per_sec)
    }

    /// Current fill level as of the last leak. Read-only; does not leak.
    pub fn tokens(&self) -> f64 {
        self.lock().tokens
    }

    /// Time needed to drain exactly one token.
    #[must_use]
    pub fn token_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.leak_rate_per_sec.recip()).unwrap_or(Duration::MAX)
    }

    /// Drain the bucket up to the current instant.
    ///
    /// A call with no elapsed time since the previous leak leaves the bucket untouched.
    pub fn leak(&self) {
        self.lock().leak(Instant::now(), self.leak_rate_per_sec);
    }

    /// Try to take a token without waiting.
    ///
    /// Returns `true` and records the call if a whole token fits under the
    /// capacity; returns `false` and leaves the bucket as leaked otherwise.
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.lock();
        bucket.leak(Instant::now(), self.leak_rate_per_sec);
        if bucket.tokens + 1.0 <= self.capacity {
            bucket.tokens += 1.0;
            true
        } else {
            false
        }
    }

    /// Wait until a token can be taken, then take it.
    ///
    /// Retries [`try_acquire`](Self::try_acquire) after sleeping for
    /// [`token_interval`](Self::token_interval). Waiters are not queued, so
    /// concurrent callers may be admitted in any order. A limiter whose
    /// capacity is below one never admits and this future never completes.
    pub async fn acquire(&self) {
        loop {
            if self.try_acquire() {
                return;
            }
            let wait = self.token_interval();
            #[cfg(feature = "tracing")]
            tracing::trace!(
                tokens = self.tokens(),
                capacity = self.capacity,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "rate limiter full; waiting for leak"
            );
            tokio::time::sleep(wait).await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Bucket> {
        // Each critical section leaves the bucket consistent, so a poisoned
        // guard is still safe to use.
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
