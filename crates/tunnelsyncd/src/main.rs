// # tunnelsyncd - Stream URL Sync Daemon
//
// The tunnelsyncd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime and tracing
// 3. Registering tunnel sources and publish sinks
// 4. Starting the sync engine
//
// This is a THIN integration layer: all reconciliation logic lives in
// tunnelsync-core. The daemon only wires components together.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `TUNNELSYNC_API_URL`: Control-plane endpoint that receives the stream URL (required)
// - `TUNNELSYNC_API_KEY`: Static credential for the control plane (required)
// - `TUNNELSYNC_AGENT_URL`: Tunnel agent introspection endpoint
//   (default: http://127.0.0.1:4040/api/tunnels)
// - `TUNNELSYNC_STREAM_SUFFIX`: Path appended to the discovered public URL
//   (default: /live/index.m3u8)
// - `TUNNELSYNC_POLL_INTERVAL`: Poll interval in seconds (default: 20)
// - `TUNNELSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export TUNNELSYNC_API_URL=https://example.com/api/weather/sky-image/hls-stream-url
// export TUNNELSYNC_API_KEY=your_key
// export TUNNELSYNC_POLL_INTERVAL=20
//
// tunnelsyncd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use tunnelsync_core::config::{EngineConfig, SinkConfig, SourceConfig, SyncConfig};
use tunnelsync_core::engine::EngineEvent;
use tunnelsync_core::{ComponentRegistry, SyncEngine};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_url: String,
    api_key: String,
    agent_url: String,
    stream_suffix: String,
    poll_interval_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env::var("TUNNELSYNC_API_URL")?,
            api_key: env::var("TUNNELSYNC_API_KEY")?,
            agent_url: env::var("TUNNELSYNC_AGENT_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:4040/api/tunnels".to_string()),
            stream_suffix: env::var("TUNNELSYNC_STREAM_SUFFIX")
                .unwrap_or_else(|_| "/live/index.m3u8".to_string()),
            poll_interval_secs: env::var("TUNNELSYNC_POLL_INTERVAL")
                .ok()
                .map(|s| s.parse().unwrap_or(20))
                .unwrap_or(20),
            log_level: env::var("TUNNELSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Performs presence, format, and range validation plus basic security
    /// checks (placeholder credentials, URL schemes).
    fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!(
                "TUNNELSYNC_API_URL is required. \
                Set it via: export TUNNELSYNC_API_URL=https://example.com/api/stream-url"
            );
        }

        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            anyhow::bail!(
                "TUNNELSYNC_API_URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            );
        }

        if self.api_key.is_empty() {
            anyhow::bail!(
                "TUNNELSYNC_API_KEY is required. \
                Set it via: export TUNNELSYNC_API_KEY=your_key"
            );
        }

        // Check for obvious placeholder credentials (common mistake)
        let key_lower = self.api_key.to_lowercase();
        if key_lower.contains("your_api_key")
            || key_lower.contains("replace_me")
            || key_lower.contains("example")
            || key_lower == "key"
        {
            anyhow::bail!(
                "TUNNELSYNC_API_KEY appears to be a placeholder. \
                Use an actual credential for the control plane."
            );
        }

        if !self.agent_url.starts_with("https://") && !self.agent_url.starts_with("http://") {
            anyhow::bail!(
                "TUNNELSYNC_AGENT_URL must use HTTP or HTTPS scheme. Got: {}",
                self.agent_url
            );
        }

        if !self.stream_suffix.starts_with('/') {
            anyhow::bail!(
                "TUNNELSYNC_STREAM_SUFFIX must start with '/'. Got: {}",
                self.stream_suffix
            );
        }

        if !(1..=3600).contains(&self.poll_interval_secs) {
            anyhow::bail!(
                "TUNNELSYNC_POLL_INTERVAL must be between 1 and 3600 seconds. Got: {}",
                self.poll_interval_secs
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "TUNNELSYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    info!("starting tunnelsyncd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("daemon error: {}", e);
            SyncExitCode::RuntimeError
        } else {
            SyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Create component registry and register built-in implementations
    let registry = ComponentRegistry::new();

    #[cfg(feature = "ngrok")]
    {
        info!("registering ngrok tunnel source");
        tunnelsync_source_ngrok::register(&registry);
    }

    #[cfg(feature = "http-sink")]
    {
        info!("registering HTTP control-plane sink");
        tunnelsync_sink_http::register(&registry);
    }

    let source_config = SourceConfig::Ngrok {
        api_url: config.agent_url.clone(),
    };
    let sink_config = SinkConfig::Http {
        api_url: config.api_url.clone(),
        api_key: config.api_key.clone(),
    };
    let sync_config = SyncConfig {
        source: source_config.clone(),
        sink: sink_config.clone(),
        engine: EngineConfig {
            poll_interval_secs: config.poll_interval_secs,
            stream_suffix: config.stream_suffix.clone(),
            ..EngineConfig::default()
        },
    };

    let source = registry.create_source(&source_config)?;
    let sink = registry.create_sink(&sink_config)?;

    let (engine, mut event_rx) = SyncEngine::new(source, sink, sync_config)?;

    // Drain engine events into the log stream at debug level
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match &event {
                EngineEvent::PublishFailed { stream_url, error } => {
                    debug!("publish failed for {}: {}", stream_url, error);
                }
                other => debug!("engine event: {:?}", other),
            }
        }
    });

    info!(
        "agent: {}, poll interval: {}s, suffix: {}",
        config.agent_url, config.poll_interval_secs, config.stream_suffix
    );
    info!("starting sync engine");

    engine.run().await?;

    Ok(())
}
