use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use probewire::{
    CallbackSink, LimiterConfig, PollConfig, ProbewireError, RelayConfig, Series,
    SessionRegistry, Snapshot, TelemetryProvider,
};
use probewire_mock::MockTelemetry;
use tokio::sync::mpsc;

const INTERVAL: Duration = Duration::from_millis(5000);

fn registry() -> SessionRegistry {
    let config = RelayConfig {
        limiter: LimiterConfig::new(3.0, 1.0),
        poll: PollConfig {
            interval: INTERVAL,
            ..PollConfig::default()
        },
    };
    SessionRegistry::new(Arc::new(MockTelemetry::new()), config).unwrap()
}

fn covering_now() -> Vec<Series> {
    vec![Series::new("Pit", vec![(0, 225.0)]).unwrap()]
}

#[tokio::test(start_paused = true)]
async fn end_to_end_one_tick_then_silence_after_unregister() {
    let registry = registry();
    let (tx, mut rx) = mpsc::channel::<Snapshot>(8);
    let session = registry.register("s1", Arc::new(tx)).unwrap();
    session.track(covering_now());
    session.start_polling_every(INTERVAL).unwrap();

    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    let snapshot = rx.try_recv().unwrap();
    assert_eq!(snapshot.readings.len(), 1);
    assert_eq!(snapshot.readings[0].value, Some(225.0));
    assert!(rx.try_recv().is_err());

    assert!(registry.unregister("s1"));
    assert!(!session.is_polling());

    tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn duplicate_register_fails_until_unregistered() {
    let registry = registry();
    let (first, _rx1) = registry.register_channel("s1").unwrap();

    let err = registry.register_channel("s1").unwrap_err();
    assert!(matches!(err, ProbewireError::DuplicateSession { ref session_id } if session_id == "s1"));
    assert_eq!(registry.len(), 1);

    assert!(registry.unregister("s1"));
    let (second, _rx2) = registry.register_channel("s1").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(first.is_retired());
    assert!(!second.is_retired());
}

#[tokio::test(start_paused = true)]
async fn unregister_unknown_id_is_a_no_op() {
    let registry = registry();
    assert!(!registry.unregister("nobody"));
    let (_session, _rx) = registry.register_channel("s1").unwrap();
    assert!(!registry.unregister("nobody"));
    assert_eq!(registry.len(), 1);

    assert!(registry.unregister("s1"));
    assert!(!registry.unregister("s1"));
    assert!(registry.is_empty());
}

#[tokio::test(start_paused = true)]
async fn lookup_returns_the_live_session() {
    let registry = registry();
    assert!(registry.lookup("s1").is_none());
    let (session, _rx) = registry.register_channel("s1").unwrap();

    let found = registry.lookup("s1").unwrap();
    assert!(Arc::ptr_eq(&session, &found));
    assert_eq!(found.id().as_str(), "s1");

    registry.unregister("s1");
    assert!(registry.lookup("s1").is_none());
}

#[tokio::test(start_paused = true)]
async fn retired_session_refuses_to_start() {
    let registry = registry();
    let (session, _rx) = registry.register_channel("s1").unwrap();
    registry.unregister("s1");

    let err = session.start_polling().unwrap_err();
    assert!(matches!(err, ProbewireError::UnknownSession { .. }));
    assert!(!session.is_polling());
}

#[tokio::test(start_paused = true)]
async fn starting_twice_requires_a_stop() {
    let registry = registry();
    let (session, _rx) = registry.register_channel("s1").unwrap();
    session.start_polling().unwrap();
    assert!(matches!(
        session.start_polling().unwrap_err(),
        ProbewireError::SchedulerRunning { .. }
    ));

    session.stop_polling();
    session.stop_polling();
    session.start_polling().unwrap();
    assert!(session.is_polling());
}

#[tokio::test(start_paused = true)]
async fn each_session_owns_its_own_bucket() {
    let registry = registry();
    let (a, _rxa) = registry.register_channel("a").unwrap();
    let (b, _rxb) = registry.register_channel("b").unwrap();

    for _ in 0..3 {
        a.gateway().list_devices().await.unwrap();
    }
    assert!(!a.gateway().limiter().try_acquire());
    assert!(b.gateway().limiter().tokens().abs() < f64::EPSILON);
    assert!(b.gateway().limiter().try_acquire());
}

#[tokio::test(start_paused = true)]
async fn sessions_poll_independently() {
    let registry = registry();
    let (a, mut rxa) = registry.register_channel("a").unwrap();
    let (b, mut rxb) = registry.register_channel("b").unwrap();
    a.track(covering_now());
    b.track(covering_now());
    a.start_polling().unwrap();
    b.start_polling().unwrap();

    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    registry.unregister("a");
    tokio::time::sleep(INTERVAL).await;

    assert_eq!(rxa.try_recv().unwrap().session_id.as_str(), "a");
    assert!(rxa.try_recv().is_err());
    assert!(rxb.try_recv().is_ok());
    assert!(rxb.try_recv().is_ok());
}

#[tokio::test(start_paused = true)]
async fn unregister_all_stops_everything() {
    let registry = registry();
    let mut receivers = Vec::new();
    for id in ["c", "a", "b"] {
        let (session, rx) = registry.register_channel(id).unwrap();
        session.start_polling().unwrap();
        receivers.push(rx);
    }
    let ids: Vec<String> = registry
        .session_ids()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);

    assert_eq!(registry.unregister_all(), 3);
    assert!(registry.is_empty());

    tokio::time::sleep(INTERVAL * 2).await;
    for rx in &mut receivers {
        assert!(rx.try_recv().is_err());
    }
}

#[test]
fn invalid_configs_are_rejected_up_front() {
    let api: Arc<dyn TelemetryProvider> = Arc::new(MockTelemetry::new());

    let never_admits = RelayConfig {
        limiter: LimiterConfig::new(0.5, 1.0),
        ..RelayConfig::default()
    };
    assert!(matches!(
        SessionRegistry::new(Arc::clone(&api), never_admits).unwrap_err(),
        ProbewireError::InvalidConfig(_)
    ));

    let zero_interval = RelayConfig {
        poll: PollConfig {
            interval: Duration::ZERO,
            ..PollConfig::default()
        },
        ..RelayConfig::default()
    };
    assert!(matches!(
        SessionRegistry::new(api, zero_interval).unwrap_err(),
        ProbewireError::InvalidConfig(_)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unregister_does_not_wait_on_a_sink_that_reads_the_registry() {
    let registry = Arc::new(registry());
    let handle: Arc<OnceLock<Arc<SessionRegistry>>> = Arc::new(OnceLock::new());
    let in_tick = Arc::new(AtomicBool::new(false));
    let lookups = Arc::new(AtomicUsize::new(0));

    let sink = {
        let handle = Arc::clone(&handle);
        let in_tick = Arc::clone(&in_tick);
        let lookups = Arc::clone(&lookups);
        CallbackSink(move |_s: Snapshot| {
            in_tick.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(300));
            if let Some(registry) = handle.get() {
                let _ = registry.lookup("s1");
                lookups.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        })
    };
    let _ = handle.set(Arc::clone(&registry));

    let session = registry.register("s1", Arc::new(sink)).unwrap();
    let (_other, _rx) = registry.register_channel("other").unwrap();
    session.start_polling_every(Duration::from_millis(50)).unwrap();

    tokio::time::timeout(Duration::from_secs(2), async {
        while !in_tick.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("first tick never ran");

    let unregistering = {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || registry.unregister("s1"))
    };

    // other sessions stay reachable while the slow tick is in progress
    tokio::time::sleep(Duration::from_millis(20)).await;
    let other = tokio::time::timeout(
        Duration::from_millis(100),
        tokio::task::spawn_blocking({
            let registry = Arc::clone(&registry);
            move || registry.lookup("other").is_some()
        }),
    )
    .await
    .expect("lookup blocked behind a slow tick")
    .unwrap();
    assert!(other);

    let removed = tokio::time::timeout(Duration::from_secs(2), unregistering)
        .await
        .expect("unregister deadlocked")
        .unwrap();
    assert!(removed);
    assert!(registry.lookup("s1").is_none());

    // the tick in progress finished before unregister returned; nothing follows it
    let after = lookups.load(Ordering::SeqCst);
    assert!(after >= 1);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(lookups.load(Ordering::SeqCst), after);
    assert!(!session.is_polling());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sink_may_inspect_its_own_session_while_it_is_retired() {
    let registry = Arc::new(registry());
    let handle: Arc<OnceLock<Arc<SessionRegistry>>> = Arc::new(OnceLock::new());
    let in_tick = Arc::new(AtomicBool::new(false));

    let sink = {
        let handle = Arc::clone(&handle);
        let in_tick = Arc::clone(&in_tick);
        CallbackSink(move |_s: Snapshot| {
            in_tick.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            if let Some(session) = handle.get().and_then(|r| r.lookup("s1")) {
                let _ = session.is_polling();
            }
            Ok(())
        })
    };
    let _ = handle.set(Arc::clone(&registry));

    let session = registry.register("s1", Arc::new(sink)).unwrap();
    session.start_polling_every(Duration::from_millis(50)).unwrap();
    while !in_tick.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let unregistering = {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || registry.unregister_all())
    };
    let removed = tokio::time::timeout(Duration::from_secs(2), unregistering)
        .await
        .expect("unregister_all deadlocked")
        .unwrap();
    assert_eq!(removed, 1);
    assert!(session.is_retired());
}
