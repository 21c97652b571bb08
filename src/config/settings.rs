//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Peer addressing
    pub peer: PeerSettings,

    /// Countdown clock
    pub clock: ClockSettings,

    /// Remote controller settings
    pub remote: RemoteSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// WebSocket configuration
    pub websocket: WebSocketSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Peer endpoint naming.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerSettings {
    /// Fixed prefix of host peer ids (`<prefix>-<CODE>`)
    pub id_prefix: String,
}

/// Countdown clock configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockSettings {
    /// Period between ticks in milliseconds (default: 1000)
    pub tick_interval_ms: u64,
}

/// Remote controller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSettings {
    /// How long to wait for the channel to open (default: 5000)
    pub connect_timeout_ms: u64,

    /// Base WebSocket URL of the host (e.g., "ws://127.0.0.1:3000")
    pub host_url: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// WebSocket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// Maximum message size in bytes (default: 64KB)
    pub max_message_size: usize,

    /// Maximum frame size in bytes (default: 16KB)
    pub max_frame_size: usize,
}

pub const DEFAULT_PEER_ID_PREFIX: &str = "ppt-timer";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a timing value is zero.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(Self::environment())
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// `APP__`-prefixed variables. `APP__CORS__ALLOWED_ORIGINS` is split on commas.
    fn environment() -> Environment {
        Environment::default()
            .prefix("APP")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("cors.allowed_origins")
    }

    /// Defaults only, without files or environment. Used by tests and
    /// embedders.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("test")?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("peer.id_prefix", DEFAULT_PEER_ID_PREFIX)?
            .set_default("clock.tick_interval_ms", DEFAULT_TICK_INTERVAL_MS)?
            .set_default("remote.connect_timeout_ms", DEFAULT_CONNECT_TIMEOUT_MS)?
            .set_default("remote.host_url", "ws://127.0.0.1:3000")?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("websocket.max_message_size", 65536_i64)? // 64KB
            .set_default("websocket.max_frame_size", 16384_i64) // 16KB
    }

    fn validate(settings: Self) -> Result<Self, ConfigError> {
        if settings.peer.id_prefix.trim().is_empty() {
            return Err(ConfigError::Message("peer.id_prefix must not be empty".into()));
        }
        if settings.clock.tick_interval_ms == 0 {
            return Err(ConfigError::Message(
                "clock.tick_interval_ms must be greater than zero".into(),
            ));
        }
        if settings.remote.connect_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "remote.connect_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(settings)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ClockSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl RemoteSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
