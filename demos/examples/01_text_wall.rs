use std::sync::Arc;

use probewire::display::render_text_wall;
use probewire::{ChartSeriesSource, PollConfig, Relay, TelemetryProvider};
use probewire_demos::common::{demo_interval, get_provider};
use probewire_mock::RECORDED_SESSION_ID;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Replay the channels of a recorded remote cook onto a watch face.
    let relay = Relay::builder()
        .api(get_provider())
        .series_source(Arc::new(ChartSeriesSource::new(RECORDED_SESSION_ID)))
        .poll(PollConfig {
            interval: demo_interval(),
            ..PollConfig::default()
        })
        .build()?;

    let (session, mut rx) = relay.on_session_start_channel("watch-1").await?;
    println!(
        "Tracking {} channels through {} (tokens spent: {})",
        session.tracked().len(),
        session.gateway().inner().name(),
        session.gateway().limiter().tokens()
    );

    for tick in 1..=3 {
        let Some(snapshot) = rx.recv().await else {
            break;
        };
        println!("--- tick {tick} at {} ---", snapshot.taken_at.format("%H:%M:%S"));
        println!("{}", render_text_wall(&snapshot));
    }

    relay.shutdown();
    Ok(())
}
