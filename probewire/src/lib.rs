//! probewire relays probe-thermometer telemetry to wearable display sessions
//! without exceeding the remote API's request budget.
//!
//! Overview
//! - `SessionRegistry` owns every live host session. Each session gets its own
//!   `RateLimitedGateway` (one leaky bucket per session) and one
//!   `PollingScheduler`.
//! - While running, a scheduler ticks on a fixed interval. Each tick samples
//!   every tracked channel at the current instant with a binary search and
//!   emits one `Snapshot` to the session's `SnapshotSink`.
//! - `Relay` wires the host lifecycle: session start registers, loads channels
//!   through a `SeriesSource`, and starts polling; session end unregisters.
//!
//! Key behaviors
//! - Unregistering stops the timer synchronously: no tick of that session fires
//!   after `unregister` returns.
//! - Ticks never block on consumers. A snapshot that cannot be delivered is
//!   logged and dropped; the next tick still fires.
//! - Ticks of one session never overlap; a slow tick defers the next one.
//! - Gateway calls that fail keep their token spent.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use probewire::{ChartSeriesSource, Relay, display::render_text_wall};
//!
//! let relay = Relay::builder()
//!     .api(Arc::new(my_provider))
//!     .series_source(Arc::new(ChartSeriesSource::new(9_366_593)))
//!     .build()?;
//!
//! let (_session, mut rx) = relay.on_session_start_channel("watch-1").await?;
//! while let Some(snapshot) = rx.recv().await {
//!     println!("{}", render_text_wall(&snapshot));
//! }
//! relay.on_session_end("watch-1");
//! ```
#![warn(missing_docs)]

pub mod display;
mod registry;
mod relay;
pub mod scheduler;
mod session;

pub use registry::SessionRegistry;
pub use relay::{Relay, RelayBuilder};
pub use scheduler::{PollingScheduler, SchedulerState};
pub use session::Session;

pub use probewire_middleware::RateLimitedGateway;

// Re-export core types for convenience
pub use probewire_core::{
    CallbackSink, ChartSeriesSource, RateLimiter, Series, SeriesSource, SnapshotSink,
    StaticSeriesSource, TelemetryProvider, rebase_all, sample_at,
};
pub use probewire_types::{
    LimiterConfig, PollConfig, ProbewireError, Reading, RelayConfig, SessionId, Snapshot,
};
