use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use probewire_core::{
    ChannelTemperature, ChartData, Device, ProbewireError, TelemetryProvider, TelemetrySession,
};

mod fixtures;
mod source;

pub use fixtures::charts::{RECORDED_SESSION_ID, RECORDED_SESSION_JSON};
pub use source::FixtureSeriesSource;

/// Device UUID whose calls fail with a transport error.
pub const FAILING_DEVICE: &str = "FAIL";
/// Device UUID whose calls fail with an authentication error.
pub const UNAUTHORIZED_DEVICE: &str = "AUTH";
/// Recorded-session id whose calls fail with a transport error.
pub const FAILING_SESSION_ID: u64 = 500;

/// Mock telemetry provider for CI-safe tests and demos. Serves deterministic
/// data from static fixtures and counts every call it receives.
pub struct MockTelemetry {
    calls: AtomicUsize,
}

impl Default for MockTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTelemetry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls that reached this provider.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn maybe_fail_device(uuid: &str, op: &'static str) -> Result<(), ProbewireError> {
        match uuid {
            FAILING_DEVICE => Err(ProbewireError::provider(
                "probewire-mock",
                format!("forced failure: {op}"),
            )),
            UNAUTHORIZED_DEVICE => Err(ProbewireError::Auth("Invalid token.".to_string())),
            _ => Ok(()),
        }
    }

    fn maybe_fail_session(id: u64, op: &'static str) -> Result<(), ProbewireError> {
        if id == FAILING_SESSION_ID {
            return Err(ProbewireError::provider(
                "probewire-mock",
                format!("forced failure: {op}"),
            ));
        }
        Ok(())
    }

    fn device_or_not_found(uuid: &str) -> Result<Device, ProbewireError> {
        fixtures::devices::by_uuid(uuid)
            .ok_or_else(|| ProbewireError::not_found(format!("device {uuid}")))
    }
}

#[async_trait]
impl TelemetryProvider for MockTelemetry {
    fn name(&self) -> &'static str {
        "probewire-mock"
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ProbewireError> {
        self.record();
        Ok(fixtures::devices::all())
    }

    async fn device(&self, uuid: &str) -> Result<Device, ProbewireError> {
        self.record();
        Self::maybe_fail_device(uuid, "device")?;
        Self::device_or_not_found(uuid)
    }

    async fn realtime_temperatures(
        &self,
        uuid: &str,
    ) -> Result<Vec<ChannelTemperature>, ProbewireError> {
        self.record();
        Self::maybe_fail_device(uuid, "realtime_temperatures")?;
        Ok(Self::device_or_not_found(uuid)?.latest_temps)
    }

    async fn drive_log(&self, uuid: &str) -> Result<Vec<serde_json::Value>, ProbewireError> {
        self.record();
        Self::maybe_fail_device(uuid, "drive_log")?;
        Self::device_or_not_found(uuid)?;
        Ok(vec![serde_json::json!({
            "drivetype": 1,
            "driveper": 0.35,
            "setpoint": 225.0,
            "currenttemp": 224.6,
        })])
    }

    async fn list_sessions(&self) -> Result<Vec<TelemetrySession>, ProbewireError> {
        self.record();
        Ok(fixtures::devices::sessions())
    }

    async fn session(&self, id: u64) -> Result<TelemetrySession, ProbewireError> {
        self.record();
        Self::maybe_fail_session(id, "session")?;
        fixtures::devices::sessions()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ProbewireError::not_found(format!("session {id}")))
    }

    async fn session_chart(&self, id: u64) -> Result<Vec<ChartData>, ProbewireError> {
        self.record();
        Self::maybe_fail_session(id, "session_chart")?;
        fixtures::charts::by_session(id)
            .ok_or_else(|| ProbewireError::not_found(format!("chart for session {id}")))
    }
}
