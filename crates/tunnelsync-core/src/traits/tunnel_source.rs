// # Tunnel Source Trait
//
// Defines the interface for discovering the current public-facing address
// of a locally running tunnel agent.
//
// ## Implementations
//
// - ngrok introspection API: `tunnelsync-source-ngrok` crate
// - Future: cloudflared metrics endpoint, frp admin API
//
// ## Usage
//
// ```rust,ignore
// use tunnelsync_core::TunnelSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* TunnelSource implementation */;
//
//     match source.discover().await? {
//         Some(url) => println!("public URL: {}", url),
//         None => println!("no tunnel exposed"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for tunnel source implementations
///
/// A source performs one read of the tunnel agent's introspection endpoint
/// per call and reports the current public URL, if any.
///
/// # Responsibilities
///
/// Sources are observers, not decision-makers:
/// - Single-shot: one network read per `discover()` call
/// - No retry logic or backoff (owned by `SyncEngine`)
/// - No publishing, no scheduling decisions
/// - Errors are propagated; the engine decides how to tolerate them
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait TunnelSource: Send + Sync {
    /// Discover the tunnel's current public URL
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))`: A matching tunnel is currently exposed
    /// - `Ok(None)`: The agent is reachable but lists no matching tunnel
    /// - `Err(Error)`: Transport failure, timeout, or malformed response
    async fn discover(&self) -> Result<Option<String>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing tunnel sources from configuration
pub trait TunnelSourceFactory: Send + Sync {
    /// Create a TunnelSource instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this source type
    ///
    /// # Returns
    ///
    /// A boxed TunnelSource trait object
    fn create(
        &self,
        config: &crate::config::SourceConfig,
    ) -> Result<Box<dyn TunnelSource>, crate::Error>;
}
