//! Core traits for the tunnelsync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`TunnelSource`]: Discover the tunnel's current public URL
//! - [`StreamPublisher`]: Deliver the derived stream URL to a remote sink

pub mod tunnel_source;
pub mod stream_publisher;

pub use tunnel_source::{TunnelSource, TunnelSourceFactory};
pub use stream_publisher::{StreamPublisher, StreamPublisherFactory};
