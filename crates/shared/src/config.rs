//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Forecast engine settings.
    #[serde(default)]
    pub forecast: ForecastSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Which forecast store implementation the server wires in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through SeaORM.
    #[default]
    Postgres,
    /// Process-local store, lost on restart.
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Store implementation to use.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database connection URL. Ignored by the memory backend.
    #[serde(default)]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Forecast engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ForecastSettings {
    /// Number of years the persisted forecast covers.
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    /// Number of quarters projected by a what-if run.
    #[serde(default = "default_what_if_quarters")]
    pub what_if_quarters: u32,
    /// Share of revenue booked as new business, in basis points.
    #[serde(default = "default_revenue_new_share_bp")]
    pub revenue_new_share_bp: i64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon_years(),
            what_if_quarters: default_what_if_quarters(),
            revenue_new_share_bp: default_revenue_new_share_bp(),
        }
    }
}

fn default_horizon_years() -> u32 {
    3
}

fn default_what_if_quarters() -> u32 {
    16
}

fn default_revenue_new_share_bp() -> i64 {
    7000 // 70% new, 30% upsell
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PIPECAST").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
