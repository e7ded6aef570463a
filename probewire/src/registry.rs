use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use probewire_core::{
    ProbewireError, RelayConfig, SessionId, Snapshot, SnapshotSink, TelemetryProvider,
};
use probewire_middleware::RateLimitedGateway;
use tokio::sync::mpsc;

use crate::session::Session;

/// Owner of the `session id -> Session` mapping.
///
/// register, lookup and unregister are atomic with respect to each other.
/// Each registered session gets a fresh gateway around the shared provider,
/// so buckets are never shared between sessions.
pub struct SessionRegistry {
    api: Arc<dyn TelemetryProvider>,
    config: RelayConfig,
    sessions: Mutex<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry whose sessions call `api`.
    ///
    /// # Errors
    /// Returns `ProbewireError::InvalidConfig` if `config` is invalid or its
    /// limiter could never admit a gateway call.
    pub fn new(
        api: Arc<dyn TelemetryProvider>,
        config: RelayConfig,
    ) -> Result<Self, ProbewireError> {
        config.validate()?;
        // a gateway refuses capacities below one token; fail here rather than on every register
        RateLimitedGateway::new(Arc::clone(&api), config.limiter)?;
        Ok(Self {
            api,
            config,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Configuration applied to every new session.
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Register a new session whose snapshots go to `sink`.
    ///
    /// The session starts with a fresh bucket and a stopped scheduler.
    ///
    /// # Errors
    /// Returns `ProbewireError::DuplicateSession` if `session_id` is already live.
    pub fn register(
        &self,
        session_id: impl Into<SessionId>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Result<Arc<Session>, ProbewireError> {
        let session_id = session_id.into();
        let mut sessions = self.lock();
        if sessions.contains_key(&session_id) {
            #[cfg(feature = "tracing")]
            tracing::warn!(session_id = %session_id, "session already registered");
            return Err(ProbewireError::DuplicateSession {
                session_id: session_id.to_string(),
            });
        }
        let gateway = RateLimitedGateway::new(Arc::clone(&self.api), self.config.limiter)?;
        let session = Arc::new(Session::new(
            session_id.clone(),
            gateway,
            sink,
            self.config.poll,
        ));
        sessions.insert(session_id.clone(), Arc::clone(&session));
        #[cfg(feature = "tracing")]
        tracing::info!(session_id = %session_id, live = sessions.len(), "session registered");
        Ok(session)
    }

    /// Register a session that emits into a bounded channel of
    /// `poll.channel_capacity` snapshots. Ticks that find it full are dropped.
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_channel(
        &self,
        session_id: impl Into<SessionId>,
    ) -> Result<(Arc<Session>, mpsc::Receiver<Snapshot>), ProbewireError> {
        let (tx, rx) = mpsc::channel::<Snapshot>(self.config.poll.channel_capacity);
        let session = self.register(session_id, Arc::new(tx))?;
        Ok((session, rx))
    }

    /// Live session registered under `session_id`, if any.
    pub fn lookup(&self, session_id: &str) -> Option<Arc<Session>> {
        self.lock().get(session_id).cloned()
    }

    /// Remove the session and stop its scheduler.
    ///
    /// The entry is removed and the session retired under the map lock; the
    /// timer is cancelled after the lock is released, so a sink that is busy in
    /// a tick never blocks other sessions. No tick of the removed session fires
    /// after this returns. Returns `false` for unknown ids.
    pub fn unregister(&self, session_id: &str) -> bool {
        let ticker = {
            let mut sessions = self.lock();
            let Some(session) = sessions.remove(session_id) else {
                return false;
            };
            #[cfg(feature = "tracing")]
            tracing::info!(session_id = %session_id, live = sessions.len(), "session unregistered");
            session.retire()
        };
        if let Some(ticker) = ticker {
            ticker.cancel();
        }
        true
    }

    /// Unregister every live session. Returns how many were removed.
    pub fn unregister_all(&self) -> usize {
        let (removed, tickers) = {
            let mut sessions = self.lock();
            let removed = sessions.len();
            let tickers: Vec<_> = sessions
                .drain()
                .filter_map(|(_id, session)| session.retire())
                .collect();
            (removed, tickers)
        };
        for ticker in tickers {
            ticker.cancel();
        }
        #[cfg(feature = "tracing")]
        if removed > 0 {
            tracing::info!(removed, "all sessions unregistered");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no session is live.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ids of the live sessions, sorted.
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("provider", &self.api.name())
            .field("config", &self.config)
            .field("sessions", &self.session_ids())
            .finish()
    }
}
