//! Contract Test: Absent-Discovery Tolerance
//!
//! Verifies the engine's behavior when the tunnel agent lists no matching
//! tunnel, or discovery fails outright:
//! - No publish call occurs while discovery yields nothing
//! - The remembered value is unchanged (the next real URL is still a change)
//! - A discovery failure is treated exactly like "no match found"
//!
//! If this test fails, the loop either publishes without a discovered
//! address or dies on a discovery failure.

mod common;

use common::*;
use std::time::Duration;
use tunnelsync_core::SyncEngine;

async fn run_engine_for(
    source: ScriptedTunnelSource,
    publisher: RecordingPublisher,
    run_for: Duration,
) {
    let (engine, _event_rx) =
        SyncEngine::new(Box::new(source), Box::new(publisher), test_config())
            .expect("engine construction succeeds");
    let engine = engine.with_poll_interval(Duration::from_millis(10));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(run_for).await;

    shutdown_tx.send(()).unwrap();
    engine_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn absent_discovery_never_publishes() {
    let source = ScriptedTunnelSource::new(vec![Discovery::Absent]);
    let publisher = RecordingPublisher::new();

    run_engine_for(source.clone(), publisher.clone(), Duration::from_millis(250)).await;

    assert!(
        source.cycle_count() >= 3,
        "engine should keep polling while nothing is exposed"
    );
    assert_eq!(
        publisher.publish_call_count(),
        0,
        "no tunnel means no publish"
    );
}

#[tokio::test]
async fn url_appearing_after_idle_cycles_publishes_once() {
    let source = ScriptedTunnelSource::new(vec![
        Discovery::Absent,
        Discovery::Absent,
        Discovery::Url("https://x.ngrok.io"),
    ]);
    let publisher = RecordingPublisher::new();

    run_engine_for(source, publisher.clone(), Duration::from_millis(250)).await;

    assert_eq!(
        publisher.published(),
        vec!["https://x.ngrok.io/live/index.m3u8".to_string()]
    );
}

#[tokio::test]
async fn discovery_failure_is_treated_as_absent() {
    let source = ScriptedTunnelSource::new(vec![
        Discovery::Fail("connection refused"),
        Discovery::Fail("connection refused"),
        Discovery::Url("https://x.ngrok.io"),
    ]);
    let publisher = RecordingPublisher::new();

    run_engine_for(source.clone(), publisher.clone(), Duration::from_millis(250)).await;

    assert!(
        source.cycle_count() >= 3,
        "discovery failures must not stop the loop"
    );
    assert_eq!(
        publisher.published(),
        vec!["https://x.ngrok.io/live/index.m3u8".to_string()],
        "the first successful discovery after failures is a change"
    );
}
