//! Session identifiers and the snapshots emitted on every tick.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a host display session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Construct a session id from any string-like value.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Value of one tracked channel at a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Channel label, e.g. "Pit" or "Probe 2".
    pub label: String,
    /// Most recent value at or before the tick instant; `None` if the channel
    /// has no sample that early.
    pub value: Option<f64>,
}

impl Reading {
    /// Build a reading for a channel.
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Per-channel values computed at one tick, in channel order.
///
/// Produced fresh on every tick and handed to the session's consumer; the
/// scheduler does not retain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Session the snapshot was produced for.
    pub session_id: SessionId,
    /// Wall-clock instant the channels were sampled at.
    pub taken_at: DateTime<Utc>,
    /// One reading per tracked channel.
    pub readings: Vec<Reading>,
}

impl Snapshot {
    /// True when there are no readings or none of them carries a value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.readings.iter().all(|r| r.value.is_none())
    }
}
