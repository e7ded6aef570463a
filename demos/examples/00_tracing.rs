use std::sync::Arc;

use probewire::{PollConfig, Relay};
use probewire_demos::common::{demo_interval, get_provider};
use probewire_mock::FixtureSeriesSource;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,probewire=debug,probewire_core=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let relay = Relay::builder()
        .api(get_provider())
        .series_source(Arc::new(FixtureSeriesSource::recorded()?))
        .poll(PollConfig {
            interval: demo_interval(),
            ..PollConfig::default()
        })
        .build()?;

    // Register, load, and poll: emits "session registered" and "scheduler started"
    let (_session, mut rx) = relay.on_session_start_channel("watch-1").await?;
    for _ in 0..2 {
        if let Some(snapshot) = rx.recv().await {
            tracing::info!(readings = snapshot.readings.len(), "snapshot received");
        }
    }

    // Duplicate start logs a warning and fails
    let dup = relay.on_session_start_channel("watch-1").await;
    tracing::info!(rejected = dup.is_err(), "duplicate start");

    relay.on_session_end("watch-1");
    Ok(())
}
