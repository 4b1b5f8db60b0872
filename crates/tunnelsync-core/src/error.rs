//! Error types for the tunnelsync system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for tunnelsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the tunnelsync system
#[derive(Error, Debug)]
pub enum Error {
    /// Discovery errors: transport failure, timeout, or an unparseable
    /// response from the tunnel agent's introspection endpoint
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Transport-level failure contacting the publish sink
    #[error("publish transport error: {0}")]
    PublishTransport(String),

    /// The publish sink answered with a failure status code (>= 300)
    #[error("publish rejected: status {status}: {body}")]
    PublishRejected {
        /// HTTP status code returned by the sink
        status: u16,
        /// Response body, for the log stream
        body: String,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a publish transport error
    pub fn publish_transport(msg: impl Into<String>) -> Self {
        Self::PublishTransport(msg.into())
    }

    /// Create a publish rejection error
    pub fn publish_rejected(status: u16, body: impl Into<String>) -> Self {
        Self::PublishRejected {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
