//! Per-session consumers of tick snapshots.

use probewire_types::{ProbewireError, Snapshot};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Receives the snapshots produced for one session.
///
/// `emit` is called from the session's ticker and must not block. A failure
/// is reported as `ProbewireError::TickEmission`; the ticker logs it, drops
/// the snapshot, and keeps ticking.
pub trait SnapshotSink: Send + Sync {
    /// Hand one snapshot to the consumer.
    ///
    /// # Errors
    /// Returns `ProbewireError::TickEmission` when the consumer cannot take it.
    fn emit(&self, snapshot: Snapshot) -> Result<(), ProbewireError>;
}

impl SnapshotSink for mpsc::Sender<Snapshot> {
    fn emit(&self, snapshot: Snapshot) -> Result<(), ProbewireError> {
        self.try_send(snapshot).map_err(|err| match err {
            TrySendError::Full(s) => {
                ProbewireError::tick_emission(s.session_id.as_str(), "consumer buffer full")
            }
            TrySendError::Closed(s) => {
                ProbewireError::tick_emission(s.session_id.as_str(), "consumer disconnected")
            }
        })
    }
}

impl SnapshotSink for mpsc::UnboundedSender<Snapshot> {
    fn emit(&self, snapshot: Snapshot) -> Result<(), ProbewireError> {
        self.send(snapshot).map_err(|err| {
            ProbewireError::tick_emission(err.0.session_id.as_str(), "consumer disconnected")
        })
    }
}

/// Adapter turning a closure into a [`SnapshotSink`].
pub struct CallbackSink<F>(pub F);

impl<F> SnapshotSink for CallbackSink<F>
where
    F: Fn(Snapshot) -> Result<(), ProbewireError> + Send + Sync,
{
    fn emit(&self, snapshot: Snapshot) -> Result<(), ProbewireError> {
        (self.0)(snapshot)
    }
}
