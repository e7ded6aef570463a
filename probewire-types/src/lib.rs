//! Probewire data transfer objects, configuration primitives, and the shared error type.
#![warn(missing_docs)]

mod config;
mod error;
mod session;
/// Payloads exchanged with the remote telemetry API.
pub mod telemetry;

pub use config::{LimiterConfig, PollConfig, RelayConfig};
pub use error::ProbewireError;
pub use session::{Reading, SessionId, Snapshot};
pub use telemetry::{
    Channel, ChannelTemperature, ChartData, Device, DeviceLog, TelemetrySession,
};
