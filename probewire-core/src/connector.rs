use async_trait::async_trait;

use probewire_types::{ChannelTemperature, ChartData, Device, ProbewireError, TelemetrySession};

/// Remote telemetry API as seen by the relay.
///
/// Each method is one outbound request. Implementations perform the transport
/// and parsing; failures surface as `Provider`, `Auth`, `Data`, or `NotFound`.
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// Human-readable provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// List every device on the account.
    async fn list_devices(&self) -> Result<Vec<Device>, ProbewireError>;

    /// Fetch a single device by UUID.
    async fn device(&self, uuid: &str) -> Result<Device, ProbewireError>;

    /// Fetch the current per-channel temperatures of a device.
    async fn realtime_temperatures(
        &self,
        uuid: &str,
    ) -> Result<Vec<ChannelTemperature>, ProbewireError>;

    /// Fetch the drive (fan controller) log of a device. Entries are passed
    /// through untyped.
    async fn drive_log(&self, uuid: &str) -> Result<Vec<serde_json::Value>, ProbewireError>;

    /// List recorded sessions.
    async fn list_sessions(&self) -> Result<Vec<TelemetrySession>, ProbewireError>;

    /// Fetch one recorded session.
    async fn session(&self, id: u64) -> Result<TelemetrySession, ProbewireError>;

    /// Fetch the per-channel chart history of a recorded session.
    async fn session_chart(&self, id: u64) -> Result<Vec<ChartData>, ProbewireError>;
}
