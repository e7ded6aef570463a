//! Per-session repeating poll timer.
//!
//! A scheduler moves `Stopped -> Running -> Stopped`. While running it owns
//! one ticker task that fires the tick body every interval. Ticks of one
//! scheduler never overlap: a slow tick defers the next one instead of
//! running concurrently with it.

pub mod jitter;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use probewire_core::{
    ProbewireError, Reading, Series, SessionId, Snapshot, SnapshotSink, TickGate, TickerHandle,
};
use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior};

use self::jitter::first_tick_delay;

/// Lifecycle state of a [`PollingScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer is live.
    Stopped,
    /// A timer is live and ticking.
    Running,
}

/// Channels a session tracks, shared between the session and its tick body.
pub type TrackedSeries = Arc<RwLock<Arc<[Series]>>>;

/// Repeating timer owned by one session.
#[derive(Debug)]
pub struct PollingScheduler {
    session_id: SessionId,
    jitter_percent: u8,
    ticker: Option<TickerHandle>,
}

impl PollingScheduler {
    /// Create a stopped scheduler for `session_id`.
    #[must_use]
    pub const fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            jitter_percent: 0,
            ticker: None,
        }
    }

    /// Delay the first tick by up to `jitter_percent` of the interval.
    #[must_use]
    pub const fn with_jitter(mut self, jitter_percent: u8) -> Self {
        self.jitter_percent = jitter_percent;
        self
    }

    /// Session this scheduler ticks for.
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        if self.ticker.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// True while a timer is live.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state(), SchedulerState::Running)
    }

    /// Start firing `on_tick` every `interval`, first one interval from now.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - `ProbewireError::InvalidConfig` if `interval` is zero or too large for
    ///   the clock, or the jitter exceeds 100 %.
    /// - `ProbewireError::SchedulerRunning` if the scheduler is already running.
    pub fn start<F>(&mut self, interval: Duration, mut on_tick: F) -> Result<(), ProbewireError>
    where
        F: FnMut() + Send + 'static,
    {
        if interval.is_zero() {
            return Err(ProbewireError::invalid_config(
                "polling interval must be greater than zero",
            ));
        }
        if self.jitter_percent > 100 {
            return Err(ProbewireError::invalid_config(format!(
                "jitter percent must be within [0, 100], got {}",
                self.jitter_percent
            )));
        }
        if self.ticker.is_some() {
            return Err(ProbewireError::SchedulerRunning {
                session_id: self.session_id.to_string(),
            });
        }

        let gate = Arc::new(TickGate::new());
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let first_tick = Instant::now()
            .checked_add(first_tick_delay(interval, self.jitter_percent))
            .ok_or_else(|| {
                ProbewireError::invalid_config(format!(
                    "polling interval {interval:?} is out of range"
                ))
            })?;
        let task_gate = Arc::clone(&gate);

        let join = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(first_tick, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticks.tick() => {
                        if task_gate.run(&mut on_tick).is_none() {
                            break;
                        }
                    }
                }
            }
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            session_id = %self.session_id,
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "scheduler started"
        );

        self.ticker = Some(TickerHandle::new(join, stop_tx, gate));
        Ok(())
    }

    /// Start ticking with a body that samples `tracked` and emits a snapshot to `sink`.
    ///
    /// # Errors
    /// Same as [`start`](Self::start).
    pub fn start_sampling(
        &mut self,
        interval: Duration,
        tracked: TrackedSeries,
        sink: Arc<dyn SnapshotSink>,
    ) -> Result<(), ProbewireError> {
        let session_id = self.session_id.clone();
        self.start(interval, move || {
            let channels = Arc::clone(&tracked.read().unwrap_or_else(PoisonError::into_inner));
            let snapshot = take_snapshot(&session_id, &channels);
            emit_or_drop(sink.as_ref(), snapshot);
        })
    }

    /// Cancel the timer. No tick body runs after this returns. Stopping a
    /// stopped scheduler is a no-op.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.detach() {
            ticker.cancel();
        }
    }

    /// Move the scheduler to `Stopped` and hand back the live timer, if any,
    /// without cancelling it.
    ///
    /// Cancelling waits for a tick body in progress. Callers that hold locks a
    /// sink may take detach under the lock and cancel after releasing it.
    #[must_use = "dropping the handle cancels the timer"]
    pub fn detach(&mut self) -> Option<TickerHandle> {
        let ticker = self.ticker.take();
        #[cfg(feature = "tracing")]
        if ticker.is_some() {
            tracing::debug!(session_id = %self.session_id, "scheduler stopped");
        }
        ticker
    }
}

/// Sample every channel at the current wall-clock instant.
pub fn take_snapshot(session_id: &SessionId, channels: &[Series]) -> Snapshot {
    let taken_at = Utc::now();
    let at = taken_at.timestamp_millis();
    Snapshot {
        session_id: session_id.clone(),
        taken_at,
        readings: channels
            .iter()
            .map(|s| Reading::new(s.label(), s.sample_at(at)))
            .collect(),
    }
}

fn emit_or_drop(sink: &dyn SnapshotSink, snapshot: Snapshot) {
    if let Err(err) = sink.emit(snapshot) {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, "dropping tick snapshot");
        #[cfg(not(feature = "tracing"))]
        let _ = err;
    }
}
