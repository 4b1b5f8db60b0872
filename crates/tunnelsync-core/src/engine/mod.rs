//! Core sync engine
//!
//! The SyncEngine is responsible for:
//! - Polling the tunnel source for the current public URL
//! - Deriving the stream URL and detecting changes
//! - Delivering changes to the publish sink
//! - Tolerating discovery and publish failures without stopping
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   discover()    ┌──────────────┐   publish()   ┌─────────────────┐
//! │ TunnelSource │ ──────────────▶ │  SyncEngine  │ ────────────▶ │ StreamPublisher │
//! └──────────────┘                 └──────────────┘               └─────────────────┘
//!                                        │
//!                                        ▼
//!                                  ┌───────────┐
//!                                  │  Events   │
//!                                  │ (notify)  │
//!                                  └───────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Discover the current public URL (errors are logged, treated as absent)
//! 2. If absent, go back to sleep
//! 3. Derive the stream URL (public URL + fixed suffix)
//! 4. Compare against the last published value (exact string equality)
//! 5. On change, publish and remember the attempt
//!
//! The remembered value advances whether or not the sink confirmed delivery:
//! a failed attempt is retried only once the URL changes again, never on the
//! next cycle. Failure tolerance is owned here, not in sources or sinks.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::traits::{StreamPublisher, TunnelSource};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Events emitted by the SyncEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started,

    /// Discovery failed; the cycle was treated as "no current address"
    DiscoveryFailed {
        error: String,
    },

    /// A new stream URL was detected
    UrlChangeDetected {
        stream_url: String,
        previous: Option<String>,
    },

    /// The sink accepted the stream URL
    PublishSucceeded {
        stream_url: String,
    },

    /// The publish attempt failed; not retried until the URL changes again
    PublishFailed {
        stream_url: String,
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Core sync engine
///
/// The engine orchestrates the discover → compare → publish loop. It runs
/// continuously, one cycle per poll interval, until shutdown.
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Start with [`SyncEngine::run()`]
/// 3. Engine runs until a shutdown signal is received
///
/// ## Threading
///
/// The loop is strictly sequential: discovery, comparison, and publish run to
/// completion before the sleep begins, and cycles never overlap. The last
/// published value is a local of the run loop, so no locking is needed.
pub struct SyncEngine {
    /// Tunnel source for discovering the public URL
    source: Box<dyn TunnelSource>,

    /// Sink for delivering the derived stream URL
    publisher: Box<dyn StreamPublisher>,

    /// Fixed path appended to the discovered public URL
    stream_suffix: String,

    /// Sleep between reconciliation cycles
    poll_interval: Duration,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Parameters
    ///
    /// - `source`: Tunnel source implementation
    /// - `publisher`: Publish sink implementation
    /// - `config`: Sync configuration (validated here)
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        source: Box<dyn TunnelSource>,
        publisher: Box<dyn StreamPublisher>,
        config: SyncConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            source,
            publisher,
            stream_suffix: config.engine.stream_suffix,
            poll_interval: Duration::from_secs(config.engine.poll_interval_secs),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Override the poll interval
    ///
    /// Configuration expresses the interval in whole seconds; this builder
    /// accepts any `Duration`, which contract tests use to drive many cycles
    /// quickly.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the engine
    ///
    /// Starts the polling loop. Runs continuously until SIGINT is received.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: Fatal error (none currently occur after startup)
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(EngineEvent::Started);
        info!(
            source = self.source.source_name(),
            sink = self.publisher.sink_name(),
            interval = ?self.poll_interval,
            "sync engine started"
        );

        // The only piece of session state: the most recently attempted
        // stream URL. Lost on restart, which forces one republish.
        let mut last_published: Option<String> = None;

        if let Some(mut rx) = shutdown_rx {
            // Test mode: wait for provided shutdown signal
            loop {
                self.run_cycle(&mut last_published).await;

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = &mut rx => {
                        info!("shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        } else {
            // Production mode: wait for SIGINT
            loop {
                self.run_cycle(&mut last_published).await;

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        }

        info!("sync engine stopped");
        Ok(())
    }

    /// Run one reconciliation cycle
    ///
    /// Never fails: discovery errors are downgraded to "no current address"
    /// and publish errors are logged without propagating, so the loop outlives
    /// any single bad cycle.
    async fn run_cycle(&self, last_published: &mut Option<String>) {
        let discovered = match self.source.discover().await {
            Ok(url) => url,
            Err(e) => {
                warn!("error fetching tunnels: {}", e);
                self.emit_event(EngineEvent::DiscoveryFailed {
                    error: e.to_string(),
                });
                None
            }
        };

        let Some(public_url) = discovered else {
            return;
        };

        let stream_url = compose_stream_url(&public_url, &self.stream_suffix);

        if last_published.as_deref() == Some(stream_url.as_str()) {
            return;
        }

        info!("new public stream URL detected: {}", stream_url);
        self.emit_event(EngineEvent::UrlChangeDetected {
            stream_url: stream_url.clone(),
            previous: last_published.clone(),
        });

        match self.publisher.publish(&stream_url).await {
            Ok(()) => {
                info!("successfully synced URL -> {}", stream_url);
                self.emit_event(EngineEvent::PublishSucceeded {
                    stream_url: stream_url.clone(),
                });
            }
            Err(e) => {
                error!("failed to publish stream URL: {}", e);
                self.emit_event(EngineEvent::PublishFailed {
                    stream_url: stream_url.clone(),
                    error: e.to_string(),
                });
            }
        }

        // Best-effort delivery: remember the attempt even if the sink did not
        // confirm it. A failed value is sent again only after the URL changes.
        *last_published = Some(stream_url);
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            // Channel is full or the observer went away. Events are advisory,
            // so drop rather than block the loop.
            warn!("event channel full, dropping event");
        }
    }

    /// Test-only helper to run the engine with a controlled shutdown signal
    ///
    /// # Visibility
    ///
    /// This is `pub` for testing purposes only. Contract tests require
    /// controlled shutdown; production code should use `run()`, which manages
    /// shutdown via SIGINT.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}

/// Derive the canonical stream URL from a discovered public URL
fn compose_stream_url(public_url: &str, suffix: &str) -> String {
    format!("{}{}", public_url, suffix)
}
