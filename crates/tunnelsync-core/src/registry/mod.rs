//! Plugin-based component registry
//!
//! The registry allows tunnel sources and publish sinks to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains in the daemon.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tunnelsync_core::registry::ComponentRegistry;
//! use tunnelsync_core::config::SourceConfig;
//!
//! // Create a registry
//! let registry = ComponentRegistry::new();
//!
//! // Register components
//! registry.register_source("ngrok", Box::new(ngrok_factory));
//!
//! // Create a source from config
//! let config = SourceConfig::Ngrok { api_url: "http://127.0.0.1:4040/api/tunnels".into() };
//! let source = registry.create_source(&config)?;
//! ```
//!
//! ## Registration
//!
//! Implementations should register themselves during initialization:
//!
//! ```rust,ignore
//! // In tunnelsync-source-ngrok crate
//! pub fn register(registry: &ComponentRegistry) {
//!     registry.register_source("ngrok", Box::new(NgrokFactory));
//! }
//! ```

use crate::config::{SinkConfig, SourceConfig};
use crate::error::{Error, Result};
use crate::traits::{StreamPublisher, StreamPublisherFactory, TunnelSource, TunnelSourceFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry for plugin-based source and sink creation
///
/// The registry maintains maps of type names to factory objects, allowing
/// dynamic instantiation based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Registered tunnel source factories
    sources: RwLock<HashMap<String, Box<dyn TunnelSourceFactory>>>,

    /// Registered publish sink factories
    sinks: RwLock<HashMap<String, Box<dyn StreamPublisherFactory>>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tunnel source factory
    ///
    /// # Parameters
    ///
    /// - `name`: Source type name (e.g. "ngrok")
    /// - `factory`: Factory object for creating source instances
    pub fn register_source(&self, name: impl Into<String>, factory: Box<dyn TunnelSourceFactory>) {
        let name = name.into();
        let mut sources = self.sources.write().unwrap();
        sources.insert(name, factory);
    }

    /// Register a publish sink factory
    ///
    /// # Parameters
    ///
    /// - `name`: Sink type name (e.g. "http")
    /// - `factory`: Factory object for creating sink instances
    pub fn register_sink(
        &self,
        name: impl Into<String>,
        factory: Box<dyn StreamPublisherFactory>,
    ) {
        let name = name.into();
        let mut sinks = self.sinks.write().unwrap();
        sinks.insert(name, factory);
    }

    /// Create a tunnel source from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn TunnelSource>)`: Created source instance
    /// - `Err(Error)`: If the source type is not registered or creation fails
    pub fn create_source(&self, config: &SourceConfig) -> Result<Box<dyn TunnelSource>> {
        let source_type = config.type_name();
        let sources = self.sources.read().unwrap();

        let factory = sources
            .get(source_type)
            .ok_or_else(|| Error::config(format!("unknown source type: {}", source_type)))?;

        factory.create(config)
    }

    /// Create a publish sink from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn StreamPublisher>)`: Created sink instance
    /// - `Err(Error)`: If the sink type is not registered or creation fails
    pub fn create_sink(&self, config: &SinkConfig) -> Result<Box<dyn StreamPublisher>> {
        let sink_type = config.type_name();
        let sinks = self.sinks.read().unwrap();

        let factory = sinks
            .get(sink_type)
            .ok_or_else(|| Error::config(format!("unknown sink type: {}", sink_type)))?;

        factory.create(config)
    }

    /// Check if a source type is registered
    pub fn has_source(&self, name: &str) -> bool {
        let sources = self.sources.read().unwrap();
        sources.contains_key(name)
    }

    /// Check if a sink type is registered
    pub fn has_sink(&self, name: &str) -> bool {
        let sinks = self.sinks.read().unwrap();
        sinks.contains_key(name)
    }

    /// List all registered source types
    pub fn list_sources(&self) -> Vec<String> {
        let sources = self.sources.read().unwrap();
        sources.keys().cloned().collect()
    }

    /// List all registered sink types
    pub fn list_sinks(&self) -> Vec<String> {
        let sinks = self.sinks.read().unwrap();
        sinks.keys().cloned().collect()
    }
}
