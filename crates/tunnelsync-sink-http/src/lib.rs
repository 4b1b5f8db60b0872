// # HTTP Control-Plane Sink
//
// This crate provides a publish sink that delivers the current stream URL to
// a remote control-plane API.
//
// ## Wire Format
//
// ```http
// POST <api_url>
// x-api-key: <static credential>
// Content-Type: application/json
//
// {"url": "<stream URL>"}
// ```
//
// Any status below 300 is success; everything else is an application-level
// rejection carrying the status and response body.
//
// ## Architectural Constraints
//
// - Makes exactly ONE HTTP request per engine publish attempt
// - NO retry or backoff logic (intentionally omitted - owned by SyncEngine)
// - NO caching of previously sent values (owned by SyncEngine)
//
// ## Security
//
// - The API key NEVER appears in logs
// - The Debug implementation redacts the API key
// - The sink fails fast at construction if the key is empty

use async_trait::async_trait;
use tunnelsync_core::config::SinkConfig;
use tunnelsync_core::traits::{StreamPublisher, StreamPublisherFactory};
use tunnelsync_core::{Error, Result};

use std::time::Duration;

/// Default HTTP timeout for publish requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Publish sink backed by an HTTP control-plane endpoint
pub struct HttpControlPlaneSink {
    /// Endpoint that receives the stream URL
    api_url: String,

    /// Static credential sent in the `x-api-key` header
    /// ⚠️ NEVER log this value
    api_key: String,

    /// HTTP client for publish requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for HttpControlPlaneSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpControlPlaneSink")
            .field("api_url", &self.api_url)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

impl HttpControlPlaneSink {
    /// Create a new HTTP control-plane sink
    ///
    /// # Parameters
    ///
    /// - `api_url`: Endpoint that receives the stream URL
    /// - `api_key`: Static credential, must be non-empty
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key or URL is empty.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_url = api_url.into();
        let api_key = api_key.into();

        if api_url.is_empty() {
            return Err(Error::config("control-plane URL cannot be empty"));
        }
        if api_key.is_empty() {
            return Err(Error::config("control-plane API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Ok(Self {
            api_url,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl StreamPublisher for HttpControlPlaneSink {
    /// Publish a stream URL to the control plane
    ///
    /// One POST per call. Status >= 300 (including redirects) is a rejection;
    /// the error carries the status and the response body for the log stream.
    async fn publish(&self, stream_url: &str) -> Result<()> {
        let body = serde_json::json!({ "url": stream_url });

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::publish_transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(Error::publish_rejected(status.as_u16(), body));
        }

        tracing::debug!("control plane accepted stream URL ({})", status);
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP control-plane sinks
pub struct HttpSinkFactory;

impl StreamPublisherFactory for HttpSinkFactory {
    fn create(&self, config: &SinkConfig) -> Result<Box<dyn StreamPublisher>> {
        match config {
            SinkConfig::Http { api_url, api_key } => Ok(Box::new(HttpControlPlaneSink::new(
                api_url.clone(),
                api_key.clone(),
            )?)),
            _ => Err(Error::config("invalid config for HTTP sink")),
        }
    }
}

/// Register the HTTP sink with a registry
pub fn register(registry: &tunnelsync_core::ComponentRegistry) {
    registry.register_sink("http", Box::new(HttpSinkFactory));
}
