//! Configuration management for the dynamic pricing server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with DP__ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use engine::EngineParameters;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Inventory data source
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Default calculation parameters; requests may override them per call
    #[serde(default)]
    pub engine: EngineParameters,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InventoryConfig {
    /// CSV file with `id,name,cost,price,days,quantity`; sample data when unset
    pub csv_path: Option<PathBuf>,

    /// DSO used to price the inventory when the request gives none
    pub default_dso: Option<u32>,
}

/// DSO used for inventory pricing when neither request nor config sets one
pub const DEFAULT_INVENTORY_DSO: u32 = 83;

impl InventoryConfig {
    pub fn dso(&self) -> u32 {
        self.default_dso.unwrap_or(DEFAULT_INVENTORY_DSO)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("DP__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DP__ prefix)
            .add_source(
                Environment::with_prefix("DP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config
            .engine
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}
