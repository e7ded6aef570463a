use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the probewire workspace.
///
/// Covers construction-time configuration failures, session lifecycle
/// conflicts, failures of wrapped remote calls, and dropped snapshot emissions.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProbewireError {
    /// Invalid limiter, scheduler, or relay parameters. Fatal at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `register` was called for a session id that is still live.
    #[error("session already registered: {session_id}")]
    DuplicateSession {
        /// The conflicting session id.
        session_id: String,
    },

    /// Host glue referenced a session id that is not registered.
    #[error("unknown session: {session_id}")]
    UnknownSession {
        /// The session id that could not be found.
        session_id: String,
    },

    /// `start` was called on a scheduler that is already running.
    #[error("scheduler already running for session {session_id}")]
    SchedulerRunning {
        /// Session that owns the running scheduler.
        session_id: String,
    },

    /// A remote provider call failed at the transport level.
    #[error("{provider} failed: {msg}")]
    Provider {
        /// Provider name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The remote API rejected the credentials attached to a call.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Issues with the returned or expected data (malformed payloads, unsorted series).
    #[error("data issue: {0}")]
    Data(String),

    /// A remote resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "device abc".
        what: String,
    },

    /// A snapshot could not be handed to the session's consumer.
    #[error("tick emission failed for session {session_id}: {reason}")]
    TickEmission {
        /// Session whose consumer was unreachable.
        session_id: String,
        /// Why the emission was dropped (buffer full, consumer gone).
        reason: String,
    },
}

impl ProbewireError {
    /// Helper: build an `InvalidConfig` error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Helper: build a `Provider` error with the provider name and message.
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `TickEmission` error.
    pub fn tick_emission(session_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TickEmission {
            session_id: session_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for failures that originate from a wrapped remote call.
    ///
    /// These are propagated unchanged through the gateway and never affect
    /// limiter state.
    #[must_use]
    pub const fn is_gateway_error(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Auth(_) | Self::Data(_) | Self::NotFound { .. }
        )
    }
}
