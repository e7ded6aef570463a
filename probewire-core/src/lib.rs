//! probewire-core
//!
//! Core building blocks of the probewire polling pipeline.
//!
//! - `limiter`: the leaky-bucket `RateLimiter` that throttles outbound calls.
//! - `timeseries`: channel `Series` and the `sample_at` point-in-time lookup.
//! - `connector`: the `TelemetryProvider` trait for the remote API.
//! - `source` / `sink`: where a session's series come from and where its snapshots go.
//! - `ticker`: cancellation plumbing for repeating timers.
//!
//! Async runtime (Tokio)
//! ---------------------
//! The limiter reads `tokio::time::Instant` and sleeps with `tokio::time::sleep`,
//! and `ticker::TickerHandle` wraps a `tokio::task::JoinHandle<()>`. Code that
//! waits on the limiter or spawns tickers must run under a Tokio 1.x runtime.
//!
#![warn(missing_docs)]

/// The `TelemetryProvider` trait implemented by remote API clients and wrappers.
pub mod connector;
/// Leaky-bucket rate limiter.
pub mod limiter;
/// Snapshot consumers.
pub mod sink;
/// Series data-provider abstraction.
pub mod source;
/// Repeating-timer handles and their cancellation gate.
pub mod ticker;
/// Channel series and point-in-time lookup.
pub mod timeseries;

pub use connector::TelemetryProvider;
pub use limiter::RateLimiter;
pub use sink::{CallbackSink, SnapshotSink};
pub use source::{ChartSeriesSource, SeriesSource, StaticSeriesSource};
pub use ticker::{TickGate, TickerHandle};
pub use timeseries::rebase::rebase_all;
pub use timeseries::{Series, sample_at};

pub use probewire_types::*;
