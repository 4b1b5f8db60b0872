//! Contract Test: Publish Failure Isolation
//!
//! Verifies the engine's best-effort delivery policy:
//! - A publish failure (transport error or failure status) never stops the loop
//! - The remembered value advances even when the attempt failed, so a failed
//!   value is NOT re-sent on the next cycle
//! - The next actual URL change is still delivered
//!
//! If this test fails, failure tolerance has either leaked into the sink or
//! the engine retries immediately, which the delivery contract forbids.

mod common;

use common::*;
use std::time::Duration;
use tunnelsync_core::SyncEngine;
use tunnelsync_core::engine::EngineEvent;

async fn run_engine_for(
    source: ScriptedTunnelSource,
    publisher: RecordingPublisher,
    run_for: Duration,
) -> Vec<EngineEvent> {
    let (engine, mut event_rx) =
        SyncEngine::new(Box::new(source), Box::new(publisher), test_config())
            .expect("engine construction succeeds");
    let engine = engine.with_poll_interval(Duration::from_millis(10));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(run_for).await;

    shutdown_tx.send(()).unwrap();
    engine_handle.await.unwrap().unwrap();

    let mut events = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn transport_error_does_not_stop_loop_or_trigger_retry() {
    let source = ScriptedTunnelSource::new(vec![Discovery::Url("https://x.ngrok.io")]);
    let publisher = RecordingPublisher::failing(PublishFailure::Transport);

    run_engine_for(source.clone(), publisher.clone(), Duration::from_millis(250)).await;

    assert!(
        source.cycle_count() >= 3,
        "the loop must keep running after a transport failure"
    );
    assert_eq!(
        publisher.publish_call_count(),
        1,
        "a failed attempt advances the remembered value; the same URL is not re-sent"
    );
}

#[tokio::test]
async fn failure_status_does_not_stop_loop_or_trigger_retry() {
    let source = ScriptedTunnelSource::new(vec![Discovery::Url("https://x.ngrok.io")]);
    let publisher = RecordingPublisher::failing(PublishFailure::Rejected(500));

    let events =
        run_engine_for(source.clone(), publisher.clone(), Duration::from_millis(250)).await;

    assert!(source.cycle_count() >= 3);
    assert_eq!(publisher.publish_call_count(), 1);

    // The failure is observable in the event/log stream
    assert!(
        events
            .iter()
            .any(|e| matches!(e, EngineEvent::PublishFailed { .. })),
        "a rejected publish must emit a failure event"
    );
}

#[tokio::test]
async fn next_change_is_still_delivered_after_a_failed_attempt() {
    let source = ScriptedTunnelSource::new(vec![
        Discovery::Url("https://x.ngrok.io"),
        Discovery::Url("https://x.ngrok.io"),
        Discovery::Url("https://y.ngrok.io"),
    ]);
    let publisher = RecordingPublisher::failing(PublishFailure::Rejected(500));

    run_engine_for(source, publisher.clone(), Duration::from_millis(250)).await;

    assert_eq!(
        publisher.published(),
        vec![
            "https://x.ngrok.io/live/index.m3u8".to_string(),
            "https://y.ngrok.io/live/index.m3u8".to_string(),
        ],
        "each change gets exactly one attempt even when every attempt fails"
    );
}
