use probewire_core::{ProbewireError, SeriesSource, SessionId, TelemetryProvider};
use probewire_mock::{
    FAILING_DEVICE, FAILING_SESSION_ID, FixtureSeriesSource, MockTelemetry, RECORDED_SESSION_ID,
    UNAUTHORIZED_DEVICE,
};

#[tokio::test]
async fn serves_fixture_devices_and_counts_calls() {
    let mock = MockTelemetry::new();
    let devices = mock.list_devices().await.expect("devices");
    assert_eq!(devices.len(), 2);

    let smoker = mock.device(&devices[0].uuid).await.expect("device");
    assert_eq!(smoker.title, "Backyard Smoker");
    let temps = mock.realtime_temperatures(&smoker.uuid).await.expect("temps");
    assert_eq!(temps.len(), 2);
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn forced_failures_and_missing_resources() {
    let mock = MockTelemetry::new();
    assert!(matches!(
        mock.device(FAILING_DEVICE).await,
        Err(ProbewireError::Provider { .. })
    ));
    assert!(matches!(
        mock.drive_log(UNAUTHORIZED_DEVICE).await,
        Err(ProbewireError::Auth(_))
    ));
    assert!(matches!(
        mock.device("nope").await,
        Err(ProbewireError::NotFound { .. })
    ));
    assert!(matches!(
        mock.session_chart(FAILING_SESSION_ID).await,
        Err(ProbewireError::Provider { .. })
    ));
    assert_eq!(mock.calls(), 4);
}

#[tokio::test]
async fn recorded_session_chart_is_served() {
    let mock = MockTelemetry::new();
    let session = mock.session(RECORDED_SESSION_ID).await.expect("session");
    assert_eq!(session.title, "Sunday brisket");
    let charts = mock.session_chart(RECORDED_SESSION_ID).await.expect("chart");
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0].x.len(), charts[0].y.len());
}

#[tokio::test]
async fn fixture_source_replays_from_now() {
    let source = FixtureSeriesSource::recorded().expect("fixture parses");
    let before = chrono::Utc::now().timestamp_millis();
    let series = source
        .load(&SessionId::from("s1"), &MockTelemetry::new())
        .await
        .expect("load");
    let after = chrono::Utc::now().timestamp_millis();

    assert_eq!(series.len(), 2);
    let first = series[0].first_timestamp().expect("pit has samples");
    assert!(first >= before && first <= after);
    // Brisket started 5s after the pit in the recording
    assert_eq!(series[1].first_timestamp(), Some(first + 5_000));
    assert_eq!(series[0].sample_at(first), Some(212.0));
    assert_eq!(series[1].sample_at(first), None);
}

#[tokio::test]
async fn fixture_source_scales_second_timestamps() {
    let json = r#"[{"label": "Pit", "x": [10, 12], "y": [1.0, 2.0]}]"#;
    let source = FixtureSeriesSource::from_json(json)
        .expect("parse")
        .timestamps_in_seconds(true);
    let series = source
        .load(&SessionId::from("s1"), &MockTelemetry::new())
        .await
        .expect("load");
    let ts = series[0].timestamps();
    assert_eq!(ts[1] - ts[0], 2_000);
}

#[test]
fn invalid_fixture_is_a_data_error() {
    assert!(matches!(
        FixtureSeriesSource::from_json("{not json"),
        Err(ProbewireError::Data(_))
    ));
    assert!(matches!(
        FixtureSeriesSource::from_file("/definitely/missing/chart.json"),
        Err(ProbewireError::Data(_))
    ));
}
