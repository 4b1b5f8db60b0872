//! Configuration types for the tunnelsync system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main tunnelsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Tunnel source configuration
    pub source: SourceConfig,

    /// Publish sink configuration
    pub sink: SinkConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SyncConfig {
    /// Create a new configuration with defaults
    pub fn new(source: SourceConfig, sink: SinkConfig) -> Self {
        Self {
            source,
            sink,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.sink.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// Tunnel source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// ngrok agent introspection API
    Ngrok {
        /// Introspection endpoint URL (e.g. "http://127.0.0.1:4040/api/tunnels")
        api_url: String,
    },

    /// Custom tunnel source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl SourceConfig {
    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SourceConfig::Ngrok { api_url } => {
                if api_url.is_empty() {
                    return Err(crate::Error::config("ngrok source URL cannot be empty"));
                }
                Ok(())
            }
            SourceConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("custom source factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("custom source config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the source type name
    pub fn type_name(&self) -> &str {
        match self {
            SourceConfig::Ngrok { .. } => "ngrok",
            SourceConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Ngrok {
            api_url: "http://127.0.0.1:4040/api/tunnels".to_string(),
        }
    }
}

/// Publish sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// HTTP control-plane sink with static credential
    Http {
        /// Endpoint that receives the stream URL
        api_url: String,
        /// Static credential sent in the `x-api-key` header
        api_key: String,
    },

    /// Custom sink
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl SinkConfig {
    /// Validate the sink configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SinkConfig::Http { api_url, api_key } => {
                if api_url.is_empty() {
                    return Err(crate::Error::config("HTTP sink URL cannot be empty"));
                }
                if api_key.is_empty() {
                    return Err(crate::Error::config("HTTP sink API key cannot be empty"));
                }
                Ok(())
            }
            SinkConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("custom sink factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("custom sink config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the sink type name
    pub fn type_name(&self) -> &str {
        match self {
            SinkConfig::Http { .. } => "http",
            SinkConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Poll interval between reconciliation cycles (in seconds)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Fixed path appended to the discovered public URL
    #[serde(default = "default_stream_suffix")]
    pub stream_suffix: String,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events will be dropped (with a warning log).
    /// This prevents unbounded memory growth if no observer drains events.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("poll interval must be > 0"));
        }
        if self.stream_suffix.is_empty() {
            return Err(crate::Error::config("stream suffix cannot be empty"));
        }
        if !self.stream_suffix.starts_with('/') {
            return Err(crate::Error::config("stream suffix must start with '/'"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            stream_suffix: default_stream_suffix(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    20
}

fn default_stream_suffix() -> String {
    "/live/index.m3u8".to_string()
}

fn default_event_channel_capacity() -> usize {
    100
}
