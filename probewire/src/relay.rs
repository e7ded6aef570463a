use std::sync::Arc;

use probewire_core::{
    LimiterConfig, PollConfig, ProbewireError, RelayConfig, SeriesSource, SessionId, Snapshot,
    SnapshotSink, TelemetryProvider,
};
use tokio::sync::mpsc;

use crate::registry::SessionRegistry;
use crate::session::Session;

/// Builder for [`Relay`].
#[derive(Default)]
pub struct RelayBuilder {
    api: Option<Arc<dyn TelemetryProvider>>,
    source: Option<Arc<dyn SeriesSource>>,
    config: RelayConfig,
}

impl RelayBuilder {
    /// Create a new builder with default limiter and polling parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider every session's gateway wraps.
    #[must_use]
    pub fn api(mut self, api: Arc<dyn TelemetryProvider>) -> Self {
        self.api = Some(api);
        self
    }

    /// Where each new session's channels come from.
    #[must_use]
    pub fn series_source(mut self, source: Arc<dyn SeriesSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub const fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Per-session bucket parameters.
    #[must_use]
    pub const fn limiter(mut self, limiter: LimiterConfig) -> Self {
        self.config.limiter = limiter;
        self
    }

    /// Per-session polling parameters.
    #[must_use]
    pub const fn poll(mut self, poll: PollConfig) -> Self {
        self.config.poll = poll;
        self
    }

    /// Build the relay.
    ///
    /// # Errors
    /// Returns `ProbewireError::InvalidConfig` if no provider or series source
    /// was set, or if the configuration is invalid.
    pub fn build(self) -> Result<Relay, ProbewireError> {
        let api = self
            .api
            .ok_or_else(|| ProbewireError::invalid_config("relay requires a telemetry provider"))?;
        let source = self
            .source
            .ok_or_else(|| ProbewireError::invalid_config("relay requires a series source"))?;
        let registry = SessionRegistry::new(api, self.config)?;
        Ok(Relay { registry, source })
    }
}

/// Host lifecycle glue: turns session start/end signals into registry
/// operations and starts each session's polling.
pub struct Relay {
    registry: SessionRegistry,
    source: Arc<dyn SeriesSource>,
}

impl Relay {
    /// Start building a relay.
    #[must_use]
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// The registry of live sessions.
    pub const fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handle a session-start signal: register the session, load its
    /// channels through its own gateway, and start polling.
    ///
    /// If loading fails the session stays registered but idle and the load
    /// error is returned; end it with [`on_session_end`](Self::on_session_end).
    ///
    /// # Errors
    /// - `ProbewireError::DuplicateSession` if the id is already live.
    /// - any error of the series source.
    /// - `ProbewireError::UnknownSession` if the session ended while loading.
    pub async fn on_session_start(
        &self,
        session_id: impl Into<SessionId>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Result<Arc<Session>, ProbewireError> {
        let session = self.registry.register(session_id, sink)?;
        self.load_and_poll(&session).await?;
        Ok(session)
    }

    /// Like [`on_session_start`](Self::on_session_start), delivering
    /// snapshots through a bounded channel.
    ///
    /// # Errors
    /// Same as [`on_session_start`](Self::on_session_start). On a load
    /// failure the receiver is dropped with the error.
    pub async fn on_session_start_channel(
        &self,
        session_id: impl Into<SessionId>,
    ) -> Result<(Arc<Session>, mpsc::Receiver<Snapshot>), ProbewireError> {
        let (session, rx) = self.registry.register_channel(session_id)?;
        self.load_and_poll(&session).await?;
        Ok((session, rx))
    }

    /// Handle a session-end signal. Unknown ids are ignored.
    pub fn on_session_end(&self, session_id: &str) -> bool {
        self.registry.unregister(session_id)
    }

    /// End every live session. Returns how many were ended.
    pub fn shutdown(&self) -> usize {
        self.registry.unregister_all()
    }

    async fn load_and_poll(&self, session: &Session) -> Result<(), ProbewireError> {
        let series = match self
            .source
            .load(session.id(), session.gateway().as_ref())
            .await
        {
            Ok(series) => series,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(session_id = %session.id(), error = %err, "failed to load series; session left idle");
                return Err(err);
            }
        };
        session.track(series);
        session.start_polling()
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
