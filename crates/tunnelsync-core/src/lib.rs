// # tunnelsync-core
//
// Core library for the tunnelsync reconciliation loop.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping a remote
// control plane in sync with a locally exposed tunnel address:
// - **TunnelSource**: Trait for discovering the tunnel's current public URL
// - **StreamPublisher**: Trait for delivering the derived stream URL to a sink
// - **SyncEngine**: Core engine that owns the poll → compare → publish loop
// - **ComponentRegistry**: Plugin-based registry for sources and sinks
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Engine-Owned Policy**: Change detection and failure tolerance live in
//    the engine; sources and sinks perform single-shot I/O only
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Best-Effort Delivery**: A publish attempt advances the remembered
//    value whether or not the sink confirmed it

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{TunnelSource, StreamPublisher};
pub use engine::SyncEngine;
pub use registry::ComponentRegistry;
pub use config::{SyncConfig, SourceConfig, SinkConfig};
pub use error::{Error, Result};
