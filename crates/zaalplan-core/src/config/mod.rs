use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::model::room::Venue;

/// Rooms used when no `venue.rooms` list is configured, in column order.
pub const DEFAULT_ROOMS: [&str; 5] = ["Oost", "West", "Zuid", "Noord", "Foyer"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub venue: VenueConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub rooms: Vec<String>,
}

impl VenueConfig {
    /// ## Summary
    /// Builds the ordered venue room set.
    ///
    /// ## Errors
    /// Returns an error if the list is empty or contains blank or duplicate names.
    pub fn venue(&self) -> crate::error::CoreResult<Venue> {
        Venue::new(self.rooms.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub enabled: bool,
    pub webhook_url: Option<String>,
    pub max_attempts: u32,
    pub batch_size: u32,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl SyncConfig {
    /// Webhook target when relaying is switched on and a URL is present.
    #[must_use]
    pub fn relay_target(&self) -> Option<&str> {
        if self.enabled {
            self.webhook_url.as_deref().filter(|url| !url.trim().is_empty())
        } else {
            None
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `config.toml` values.
    ///
    /// Environment keys use the `ZAALPLAN_` prefix and `__` between sections,
    /// e.g. `ZAALPLAN_DATABASE__URL` or `ZAALPLAN_VENUE__ROOMS=Oost,West`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8697)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 4)?
            .set_default("storage.backend", "postgres")?
            .set_default("logging.level", "debug")?
            .set_default("venue.rooms", DEFAULT_ROOMS.to_vec())?
            .set_default("sync.enabled", false)?
            .set_default("sync.max_attempts", 8)?
            .set_default("sync.batch_size", 25)?
            .set_default("sync.poll_interval_secs", 5)?
            .set_default("sync.request_timeout_secs", 10)?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env file and process environment
            .add_source(
                config::Environment::with_prefix("ZAALPLAN")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("venue.rooms")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
