// # Stream Publisher Trait
//
// Defines the interface for delivering the derived stream URL to a remote
// control plane.
//
// ## Implementations
//
// - HTTP sink with static `x-api-key` credential: `tunnelsync-sink-http` crate
//
// ## Usage
//
// ```rust,ignore
// use tunnelsync_core::StreamPublisher;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let sink = /* StreamPublisher implementation */;
//
//     sink.publish("https://x.ngrok.io/live/index.m3u8").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for publish sink implementations
///
/// A publisher performs exactly one write request per call. The engine owns
/// the delivery policy: a failed attempt is not retried by the sink, and the
/// engine decides whether and when the value is sent again.
///
/// # Responsibilities
///
/// Sinks are isolated, stateless, single-shot components:
/// - One outbound request per `publish()` call
/// - No retry logic or backoff (owned by `SyncEngine`)
/// - No caching of previously published values (owned by `SyncEngine`)
/// - Credentials must never appear in logs or `Debug` output
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait StreamPublisher: Send + Sync {
    /// Publish a stream URL to the sink
    ///
    /// # Parameters
    ///
    /// - `stream_url`: The fully-formed stream URL, non-empty
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The sink accepted the value (status < 300)
    /// - `Err(Error::PublishRejected)`: The sink answered with a failure code
    /// - `Err(Error::PublishTransport)`: The sink could not be reached
    async fn publish(&self, stream_url: &str) -> Result<(), crate::Error>;

    /// Get the sink name (for logging/debugging)
    fn sink_name(&self) -> &'static str;
}

/// Helper trait for constructing publish sinks from configuration
pub trait StreamPublisherFactory: Send + Sync {
    /// Create a StreamPublisher instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this sink type
    ///
    /// # Returns
    ///
    /// A boxed StreamPublisher trait object
    fn create(
        &self,
        config: &crate::config::SinkConfig,
    ) -> Result<Box<dyn StreamPublisher>, crate::Error>;
}
