use std::sync::Arc;
use std::time::Duration;

use probewire::display::render_text_wall;
use probewire::{
    ChartSeriesSource, LimiterConfig, PollConfig, ProbewireError, Relay, Series, Snapshot,
    StaticSeriesSource,
};
use probewire_mock::{FAILING_SESSION_ID, FixtureSeriesSource, MockTelemetry, RECORDED_SESSION_ID};
use tokio::sync::mpsc;

const INTERVAL: Duration = Duration::from_millis(5000);

fn poll() -> PollConfig {
    PollConfig {
        interval: INTERVAL,
        ..PollConfig::default()
    }
}

#[test]
fn builder_requires_provider_and_source() {
    let err = Relay::builder()
        .series_source(Arc::new(StaticSeriesSource::default()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ProbewireError::InvalidConfig(ref msg) if msg.contains("provider")));

    let err = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ProbewireError::InvalidConfig(ref msg) if msg.contains("series source")));

    let err = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .series_source(Arc::new(StaticSeriesSource::default()))
        .limiter(LimiterConfig::new(10.0, 0.0))
        .build()
        .unwrap_err();
    assert!(matches!(err, ProbewireError::InvalidConfig(_)));
}

#[tokio::test(start_paused = true)]
async fn session_start_loads_and_polls_the_recorded_cook() {
    let relay = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .series_source(Arc::new(FixtureSeriesSource::recorded().unwrap()))
        .poll(poll())
        .build()
        .unwrap();

    let (session, mut rx) = relay.on_session_start_channel("watch-1").await.unwrap();
    assert!(session.is_polling());
    assert_eq!(session.tracked().len(), 2);

    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    let snapshot = rx.try_recv().unwrap();
    // the replay starts now, so only the first pit sample is active yet
    assert_eq!(render_text_wall(&snapshot), "Pit: 212.0°F\nBrisket: --");

    assert!(relay.on_session_end("watch-1"));
    tokio::time::sleep(INTERVAL * 2).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn chart_source_fetches_through_the_session_gateway() {
    let mock = Arc::new(MockTelemetry::new());
    let relay = Relay::builder()
        .api(mock.clone())
        .series_source(Arc::new(ChartSeriesSource::new(RECORDED_SESSION_ID)))
        .limiter(LimiterConfig::new(5.0, 1.0))
        .poll(poll())
        .build()
        .unwrap();

    let (tx, mut rx) = mpsc::channel::<Snapshot>(4);
    let session = relay.on_session_start("watch-1", Arc::new(tx)).await.unwrap();
    assert_eq!(mock.calls(), 1);
    assert!((session.gateway().limiter().tokens() - 1.0).abs() < 1e-9);

    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    let snapshot = rx.try_recv().unwrap();
    let values: Vec<Option<f64>> = snapshot.readings.iter().map(|r| r.value).collect();
    assert_eq!(values, [Some(226.0), Some(49.9)]);
    // ticks sample cached series and never call the provider
    assert_eq!(mock.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_load_leaves_the_session_registered_but_idle() {
    let relay = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .series_source(Arc::new(ChartSeriesSource::new(FAILING_SESSION_ID)))
        .poll(poll())
        .build()
        .unwrap();

    let (tx, _rx) = mpsc::channel::<Snapshot>(4);
    let err = relay.on_session_start("watch-1", Arc::new(tx)).await.unwrap_err();
    assert!(err.is_gateway_error());

    let session = relay.registry().lookup("watch-1").unwrap();
    assert!(!session.is_polling());
    assert!(relay.on_session_end("watch-1"));
}

#[tokio::test(start_paused = true)]
async fn duplicate_start_is_rejected() {
    let relay = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .series_source(Arc::new(StaticSeriesSource::new(vec![
            Series::new("Pit", vec![(0, 225.0)]).unwrap(),
        ])))
        .poll(poll())
        .build()
        .unwrap();

    let (_session, _rx) = relay.on_session_start_channel("watch-1").await.unwrap();
    let err = relay.on_session_start_channel("watch-1").await.unwrap_err();
    assert!(matches!(err, ProbewireError::DuplicateSession { .. }));
    assert_eq!(relay.registry().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_ends_every_session() {
    let relay = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .series_source(Arc::new(StaticSeriesSource::default()))
        .poll(poll())
        .build()
        .unwrap();

    let mut receivers = Vec::new();
    for id in ["a", "b"] {
        let (_session, rx) = relay.on_session_start_channel(id).await.unwrap();
        receivers.push(rx);
    }
    assert_eq!(relay.shutdown(), 2);
    assert!(relay.registry().is_empty());
    assert!(!relay.on_session_end("a"));

    tokio::time::sleep(INTERVAL * 2).await;
    for rx in &mut receivers {
        assert!(rx.try_recv().is_err());
    }
}

#[tokio::test(start_paused = true)]
async fn empty_source_still_emits_placeholder_snapshots() {
    let relay = Relay::builder()
        .api(Arc::new(MockTelemetry::new()))
        .series_source(Arc::new(StaticSeriesSource::default()))
        .poll(poll())
        .build()
        .unwrap();

    let (_session, mut rx) = relay.on_session_start_channel("watch-1").await.unwrap();
    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    let snapshot = rx.try_recv().unwrap();
    assert_eq!(render_text_wall(&snapshot), "No temperature data available.");
}
