// # ngrok Tunnel Source
//
// This crate provides a tunnel source backed by the ngrok agent's local
// introspection API.
//
// ## Architecture
//
// The agent exposes `GET /api/tunnels` on a local port (4040 by default),
// returning a JSON object whose `tunnels` key holds the active exposures in
// agent order. One GET per `discover()` call; no authentication.
//
// ## Selection
//
// The first tunnel whose `proto` is `"https"` wins. Agent order is
// authoritative and is not re-sorted.

use tunnelsync_core::ComponentRegistry;
use tunnelsync_core::config::SourceConfig;
use tunnelsync_core::traits::{TunnelSource, TunnelSourceFactory};
use tunnelsync_core::{Error, Result};

use serde::Deserialize;
use std::time::Duration;

/// Default introspection endpoint of a locally running ngrok agent
pub const DEFAULT_AGENT_API: &str = "http://127.0.0.1:4040/api/tunnels";

/// Default HTTP timeout for introspection requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One active exposure as reported by the agent
///
/// Transient: exists only for the duration of one discovery call. Unknown
/// fields in the agent response are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TunnelRecord {
    /// Tunnel protocol, e.g. "http" or "https"
    pub proto: String,
    /// Public-facing base address, without path
    pub public_url: String,
}

/// Top-level introspection response
#[derive(Debug, Default, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<TunnelRecord>,
}

/// Select the public URL of the first https tunnel, in agent order
fn first_https_url(tunnels: &[TunnelRecord]) -> Option<&str> {
    tunnels
        .iter()
        .find(|t| t.proto == "https")
        .map(|t| t.public_url.as_str())
}

/// Tunnel source backed by the ngrok agent introspection API
#[derive(Debug)]
pub struct NgrokTunnelSource {
    /// Introspection endpoint URL
    api_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl NgrokTunnelSource {
    /// Create a new ngrok tunnel source
    ///
    /// # Parameters
    ///
    /// - `api_url`: Introspection endpoint (e.g. [`DEFAULT_AGENT_API`])
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl TunnelSource for NgrokTunnelSource {
    async fn discover(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .map_err(|e| Error::discovery(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(Error::discovery(format!(
                "agent returned status {}",
                status
            )));
        }

        let list: TunnelList = response
            .json()
            .await
            .map_err(|e| Error::discovery(format!("failed to parse response: {}", e)))?;

        tracing::debug!("agent listed {} active tunnel(s)", list.tunnels.len());

        Ok(first_https_url(&list.tunnels).map(String::from))
    }

    fn source_name(&self) -> &'static str {
        "ngrok"
    }
}

/// Factory for creating ngrok tunnel sources
pub struct NgrokFactory;

impl TunnelSourceFactory for NgrokFactory {
    fn create(&self, config: &SourceConfig) -> Result<Box<dyn TunnelSource>> {
        match config {
            SourceConfig::Ngrok { api_url } => {
                if api_url.is_empty() {
                    return Err(Error::config("ngrok source URL is required"));
                }

                Ok(Box::new(NgrokTunnelSource::new(api_url.clone())))
            }
            _ => Err(Error::config("invalid config for ngrok source")),
        }
    }
}

/// Register the ngrok source with a registry
pub fn register(registry: &ComponentRegistry) {
    registry.register_source("ngrok", Box::new(NgrokFactory));
}
