//! Rate-limited provider wrapper.
//!
//! Every outbound call first takes a token from the gateway's own
//! [`RateLimiter`]. Tokens are never refunded: a call that fails still
//! contacted the remote endpoint and counts against the budget.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use probewire_core::{RateLimiter, TelemetryProvider};
use probewire_types::{
    ChannelTemperature, ChartData, Device, LimiterConfig, ProbewireError, TelemetrySession,
};

/// Wrapper that throttles calls to an inner provider through a leaky bucket.
pub struct RateLimitedGateway {
    inner: Arc<dyn TelemetryProvider>,
    limiter: RateLimiter,
}

impl RateLimitedGateway {
    /// Wrap `inner` with a fresh limiter built from `config`.
    ///
    /// # Errors
    /// Returns `ProbewireError::InvalidConfig` if the limiter parameters are
    /// invalid or the capacity is below one token, since such a bucket never
    /// admits a call.
    pub fn new(
        inner: Arc<dyn TelemetryProvider>,
        config: LimiterConfig,
    ) -> Result<Self, ProbewireError> {
        let limiter = RateLimiter::new(config)?;
        if limiter.capacity() < 1.0 {
            return Err(ProbewireError::invalid_config(format!(
                "gateway capacity {} can never admit a call",
                limiter.capacity()
            )));
        }
        Ok(Self { inner, limiter })
    }

    /// Access the inner provider.
    pub fn inner(&self) -> &Arc<dyn TelemetryProvider> {
        &self.inner
    }

    /// Access the limiter guarding this gateway.
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Wait for a token, then run `f` and return its output unchanged.
    ///
    /// No ordering is implied between concurrent callers; whoever retries
    /// first after a leak gets the token.
    pub async fn call<F, Fut>(&self, f: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        self.limiter.acquire().await;
        f().await
    }

    fn observe<T>(
        &self,
        op: &'static str,
        res: Result<T, ProbewireError>,
    ) -> Result<T, ProbewireError> {
        #[cfg(feature = "tracing")]
        if let Err(err) = &res {
            tracing::debug!(
                provider = self.inner.name(),
                op,
                tokens = self.limiter.tokens(),
                error = %err,
                "gateway call failed; token stays spent"
            );
        }
        #[cfg(not(feature = "tracing"))]
        let _ = op;
        res
    }
}

#[async_trait]
impl TelemetryProvider for RateLimitedGateway {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ProbewireError> {
        let res = self.call(|| self.inner.list_devices()).await;
        self.observe("list_devices", res)
    }

    async fn device(&self, uuid: &str) -> Result<Device, ProbewireError> {
        let res = self.call(|| self.inner.device(uuid)).await;
        self.observe("device", res)
    }

    async fn realtime_temperatures(
        &self,
        uuid: &str,
    ) -> Result<Vec<ChannelTemperature>, ProbewireError> {
        let res = self.call(|| self.inner.realtime_temperatures(uuid)).await;
        self.observe("realtime_temperatures", res)
    }

    async fn drive_log(&self, uuid: &str) -> Result<Vec<serde_json::Value>, ProbewireError> {
        let res = self.call(|| self.inner.drive_log(uuid)).await;
        self.observe("drive_log", res)
    }

    async fn list_sessions(&self) -> Result<Vec<TelemetrySession>, ProbewireError> {
        let res = self.call(|| self.inner.list_sessions()).await;
        self.observe("list_sessions", res)
    }

    async fn session(&self, id: u64) -> Result<TelemetrySession, ProbewireError> {
        let res = self.call(|| self.inner.session(id)).await;
        self.observe("session", res)
    }

    async fn session_chart(&self, id: u64) -> Result<Vec<ChartData>, ProbewireError> {
        let res = self.call(|| self.inner.session_chart(id)).await;
        self.observe("session_chart", res)
    }
}
