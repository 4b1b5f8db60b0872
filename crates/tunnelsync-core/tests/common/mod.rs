//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal test doubles that verify the reconciliation
//! contract without performing real network I/O.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tunnelsync_core::config::{EngineConfig, SinkConfig, SourceConfig, SyncConfig};
use tunnelsync_core::error::Result;
use tunnelsync_core::traits::{StreamPublisher, TunnelSource};

/// One scripted discovery outcome
#[derive(Debug, Clone)]
pub enum Discovery {
    /// The agent reports this public URL
    Url(&'static str),
    /// The agent is reachable but lists no matching tunnel
    Absent,
    /// Discovery fails (transport error / malformed response)
    Fail(&'static str),
}

/// A tunnel source that replays a fixed script, one step per cycle
///
/// After the script is exhausted the last step is repeated, so the engine can
/// run any number of extra cycles without changing the observable outcome.
/// Clones share the script cursor, letting tests keep a handle for assertions
/// while the engine owns the boxed copy.
#[derive(Clone)]
pub struct ScriptedTunnelSource {
    script: Arc<Vec<Discovery>>,
    cursor: Arc<AtomicUsize>,
}

impl ScriptedTunnelSource {
    pub fn new(script: Vec<Discovery>) -> Self {
        Self {
            script: Arc::new(script),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of completed discovery calls (= engine cycles so far)
    pub fn cycle_count(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TunnelSource for ScriptedTunnelSource {
    async fn discover(&self) -> Result<Option<String>> {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .get(idx)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(Discovery::Absent);

        match step {
            Discovery::Url(url) => Ok(Some(url.to_string())),
            Discovery::Absent => Ok(None),
            Discovery::Fail(msg) => Err(tunnelsync_core::Error::discovery(msg)),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// How a failing publisher should fail
#[derive(Debug, Clone, Copy)]
pub enum PublishFailure {
    /// Transport-level error (sink unreachable)
    Transport,
    /// Application-level rejection with this status code
    Rejected(u16),
}

/// A publisher that records every attempted URL
///
/// Clones share the recording, letting tests keep a handle for assertions
/// while the engine owns the boxed copy.
#[derive(Clone)]
pub struct RecordingPublisher {
    published: Arc<std::sync::Mutex<Vec<String>>>,
    failure: Option<PublishFailure>,
}

impl RecordingPublisher {
    /// A publisher whose every attempt succeeds
    pub fn new() -> Self {
        Self {
            published: Arc::new(std::sync::Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// A publisher whose every attempt fails in the given way
    pub fn failing(failure: PublishFailure) -> Self {
        Self {
            published: Arc::new(std::sync::Mutex::new(Vec::new())),
            failure: Some(failure),
        }
    }

    /// All URLs the engine attempted to publish, in order
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    /// Number of publish attempts
    pub fn publish_call_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl StreamPublisher for RecordingPublisher {
    async fn publish(&self, stream_url: &str) -> Result<()> {
        self.published.lock().unwrap().push(stream_url.to_string());

        match self.failure {
            None => Ok(()),
            Some(PublishFailure::Transport) => Err(tunnelsync_core::Error::publish_transport(
                "sink unreachable",
            )),
            Some(PublishFailure::Rejected(status)) => Err(
                tunnelsync_core::Error::publish_rejected(status, "rejected by sink"),
            ),
        }
    }

    fn sink_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a minimal SyncConfig for testing
///
/// The source/sink sections only need to pass validation; the tests inject
/// doubles directly, so these values are never dialed.
pub fn test_config() -> SyncConfig {
    SyncConfig {
        source: SourceConfig::Ngrok {
            api_url: "http://127.0.0.1:4040/api/tunnels".to_string(),
        },
        sink: SinkConfig::Http {
            api_url: "https://control-plane.test/api/stream-url".to_string(),
            api_key: "test-key".to_string(),
        },
        engine: EngineConfig {
            poll_interval_secs: 1,
            stream_suffix: "/live/index.m3u8".to_string(),
            event_channel_capacity: 100,
        },
    }
}
