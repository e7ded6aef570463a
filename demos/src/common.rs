use std::sync::Arc;
use std::time::Duration;

use probewire::TelemetryProvider;

/// Return the telemetry provider for demos.
///
/// Only the deterministic mock ships with the workspace; a live HTTP client
/// plugs in here as another `TelemetryProvider`.
#[must_use]
pub fn get_provider() -> Arc<dyn TelemetryProvider> {
    if std::env::var("PROBEWIRE_DEMOS_USE_MOCK").is_ok() {
        println!("--- (Using Mock Provider for CI) ---");
    }
    Arc::new(probewire_mock::MockTelemetry::new())
}

/// Polling interval for demos: short under CI so runs finish quickly.
#[must_use]
pub fn demo_interval() -> Duration {
    if std::env::var("PROBEWIRE_DEMOS_USE_MOCK").is_ok() {
        Duration::from_millis(200)
    } else {
        Duration::from_secs(2)
    }
}
