use std::sync::Arc;
use std::time::Duration;

use probewire::{PollConfig, Relay, Series, StaticSeriesSource};
use probewire_demos::common::{demo_interval, get_provider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pit = Series::new("Pit", vec![(0, 225.0)])?;
    let relay = Relay::builder()
        .api(get_provider())
        .series_source(Arc::new(StaticSeriesSource::new(vec![pit])))
        .poll(PollConfig {
            interval: demo_interval(),
            // spread first ticks so sessions started together do not fire in lock-step
            jitter_percent: 50,
            ..PollConfig::default()
        })
        .build()?;

    let mut receivers = Vec::new();
    for id in ["watch-1", "watch-2", "watch-3"] {
        let (_session, rx) = relay.on_session_start_channel(id).await?;
        receivers.push(rx);
    }
    println!("live sessions: {:?}", relay.registry().session_ids());

    tokio::time::sleep(demo_interval() * 3 + Duration::from_millis(50)).await;

    // One watch disconnects; the others keep polling.
    relay.on_session_end("watch-2");
    tokio::time::sleep(demo_interval() * 2).await;

    for rx in &mut receivers {
        let mut count = 0;
        let mut last = None;
        while let Ok(snapshot) = rx.try_recv() {
            count += 1;
            last = Some(snapshot.session_id);
        }
        println!("{}: {count} snapshots", last.map_or_else(|| "-".to_string(), |id| id.to_string()));
    }

    println!("ended {} sessions", relay.shutdown());
    Ok(())
}
