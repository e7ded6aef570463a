//! Configuration types consumed by the limiter, scheduler, and relay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ProbewireError;

/// Requests per hour allowed by the remote telemetry API.
const REMOTE_REQUESTS_PER_HOUR: f64 = 200.0;

/// Parameters of a leaky-bucket rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Maximum number of tokens the bucket can hold (admissions without waiting).
    pub capacity: f64,
    /// Tokens drained from the bucket per second.
    pub leak_rate_per_sec: f64,
}

impl LimiterConfig {
    /// Build a limiter config from a capacity and a leak rate.
    #[must_use]
    pub const fn new(capacity: f64, leak_rate_per_sec: f64) -> Self {
        Self {
            capacity,
            leak_rate_per_sec,
        }
    }

    /// Check that the bucket parameters are usable.
    ///
    /// # Errors
    /// Returns `ProbewireError::InvalidConfig` when the capacity is negative or
    /// not finite, or when the leak rate is not a finite positive number.
    pub fn validate(&self) -> Result<(), ProbewireError> {
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return Err(ProbewireError::invalid_config(format!(
                "limiter capacity must be a finite value >= 0, got {}",
                self.capacity
            )));
        }
        if !self.leak_rate_per_sec.is_finite() || self.leak_rate_per_sec <= 0.0 {
            return Err(ProbewireError::invalid_config(format!(
                "limiter leak rate must be a finite value > 0, got {}",
                self.leak_rate_per_sec
            )));
        }
        Ok(())
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            capacity: REMOTE_REQUESTS_PER_HOUR,
            leak_rate_per_sec: REMOTE_REQUESTS_PER_HOUR / 3600.0,
        }
    }
}

/// Parameters of a per-session polling scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Time between two ticks.
    pub interval: Duration,
    /// Number of snapshots buffered per session before new ones are dropped.
    pub channel_capacity: usize,
    /// Random delay in [0, 100] percent of `interval` added before the first tick only.
    pub jitter_percent: u8,
}

impl PollConfig {
    /// Check that the polling parameters are usable.
    ///
    /// # Errors
    /// Returns `ProbewireError::InvalidConfig` for a zero interval, a zero
    /// channel capacity, or a jitter percentage above 100.
    pub fn validate(&self) -> Result<(), ProbewireError> {
        if self.interval.is_zero() {
            return Err(ProbewireError::invalid_config(
                "polling interval must be greater than zero",
            ));
        }
        if self.channel_capacity == 0 {
            return Err(ProbewireError::invalid_config(
                "snapshot channel capacity must be greater than zero",
            ));
        }
        if self.jitter_percent > 100 {
            return Err(ProbewireError::invalid_config(format!(
                "jitter percent must be within [0, 100], got {}",
                self.jitter_percent
            )));
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            channel_capacity: 16,
            jitter_percent: 0,
        }
    }
}

/// Top-level configuration for the relay.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Bucket parameters applied to every session's gateway.
    pub limiter: LimiterConfig,
    /// Polling parameters applied to every session's scheduler.
    pub poll: PollConfig,
}

impl RelayConfig {
    /// Validate every nested section.
    ///
    /// # Errors
    /// Returns the first `ProbewireError::InvalidConfig` found.
    pub fn validate(&self) -> Result<(), ProbewireError> {
        self.limiter.validate()?;
        self.poll.validate()
    }
}
