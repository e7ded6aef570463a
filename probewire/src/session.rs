use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use probewire_core::{
    PollConfig, ProbewireError, Series, SessionId, SnapshotSink, TelemetryProvider, TickerHandle,
};
use probewire_middleware::RateLimitedGateway;

use crate::scheduler::{PollingScheduler, TrackedSeries};

/// One live host session: its own rate-limited gateway, one polling
/// scheduler, and the channels it currently tracks.
///
/// Sessions are created by [`SessionRegistry::register`](crate::SessionRegistry::register)
/// and are shared as `Arc<Session>`. Once unregistered a session is retired:
/// its scheduler is stopped and it refuses to start polling again.
///
/// The session's sink is called from the tick body with no registry or
/// session lock held, so it may look sessions up. It must not stop polling
/// of its own session synchronously, since stopping waits for the running
/// tick body to finish.
pub struct Session {
    id: SessionId,
    gateway: Arc<RateLimitedGateway>,
    series: TrackedSeries,
    sink: Arc<dyn SnapshotSink>,
    poll: PollConfig,
    state: Mutex<SessionState>,
}

struct SessionState {
    scheduler: PollingScheduler,
    retired: bool,
}

impl Session {
    pub(crate) fn new(
        id: SessionId,
        gateway: RateLimitedGateway,
        sink: Arc<dyn SnapshotSink>,
        poll: PollConfig,
    ) -> Self {
        let scheduler = PollingScheduler::new(id.clone()).with_jitter(poll.jitter_percent);
        Self {
            id,
            gateway: Arc::new(gateway),
            series: Arc::new(RwLock::new(Arc::from(Vec::new()))),
            sink,
            poll,
            state: Mutex::new(SessionState {
                scheduler,
                retired: false,
            }),
        }
    }

    /// Identifier of this session.
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// The session's rate-limited API handle.
    ///
    /// Every session owns its own bucket; calls made here never draw from
    /// another session's budget.
    pub const fn gateway(&self) -> &Arc<RateLimitedGateway> {
        &self.gateway
    }

    /// Polling parameters this session was registered with.
    pub const fn poll_config(&self) -> PollConfig {
        self.poll
    }

    /// Replace the tracked channels. Takes effect from the next tick.
    pub fn track(&self, series: impl Into<Arc<[Series]>>) {
        let series = series.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(session_id = %self.id, channels = series.len(), "tracking channels");
        *self.series.write().unwrap_or_else(PoisonError::into_inner) = series;
    }

    /// Channels currently tracked.
    pub fn tracked(&self) -> Arc<[Series]> {
        Arc::clone(&self.series.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Start polling at the configured interval.
    ///
    /// # Errors
    /// See [`start_polling_every`](Self::start_polling_every).
    pub fn start_polling(&self) -> Result<(), ProbewireError> {
        self.start_polling_every(self.poll.interval)
    }

    /// Start polling every `interval`, emitting one snapshot per tick to the
    /// session's sink. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - `ProbewireError::UnknownSession` if the session was unregistered.
    /// - `ProbewireError::SchedulerRunning` if polling is already running.
    /// - `ProbewireError::InvalidConfig` if `interval` is zero or out of range.
    pub fn start_polling_every(&self, interval: Duration) -> Result<(), ProbewireError> {
        let mut state = self.lock();
        if state.retired {
            return Err(ProbewireError::UnknownSession {
                session_id: self.id.to_string(),
            });
        }
        state.scheduler.start_sampling(
            interval,
            Arc::clone(&self.series),
            Arc::clone(&self.sink),
        )
    }

    /// Stop polling. No tick fires after this returns; a no-op when idle.
    pub fn stop_polling(&self) {
        let ticker = self.lock().scheduler.detach();
        if let Some(ticker) = ticker {
            ticker.cancel();
        }
    }

    /// True while the scheduler is running.
    pub fn is_polling(&self) -> bool {
        self.lock().scheduler.is_running()
    }

    /// True once the session has been unregistered.
    pub fn is_retired(&self) -> bool {
        self.lock().retired
    }

    /// Mark the session retired and detach its timer. The caller cancels the
    /// returned handle once it holds no lock a sink might take.
    pub(crate) fn retire(&self) -> Option<TickerHandle> {
        let mut state = self.lock();
        state.retired = true;
        state.scheduler.detach()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("provider", &self.gateway.name())
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}
