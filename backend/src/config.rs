//! Configuration management for the SpatialGPT server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SPATIALGPT_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Log output configuration
    pub log: LogConfig,

    /// Language model provider configuration
    pub llm: LlmConfig,

    /// Open-Meteo endpoint configuration
    pub open_meteo: OpenMeteoConfig,

    /// Nominatim geocoding configuration
    pub geocoding: GeocodingConfig,

    /// Overpass POI configuration
    pub overpass: OverpassConfig,

    /// Uploaded file storage
    pub storage: StorageConfig,

    /// Visualization response cache
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Gemini API key
    pub api_key: String,

    /// Generative Language API base URL
    pub base_url: String,

    /// Model behind the `chat-model-small`, `title-model` and `artifact-model` aliases
    pub chat_model: String,

    /// Model behind the `chat-model-large` alias
    pub large_model: String,

    /// Maximum model calls per chat request
    pub max_steps: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenMeteoConfig {
    pub forecast_url: String,
    pub archive_url: String,
    pub air_quality_url: String,
    pub climate_url: String,
    pub marine_url: String,
    pub flood_url: String,
    pub ensemble_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    pub base_url: String,

    /// User-Agent required by the Nominatim usage policy
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    /// Overpass interpreter URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory uploaded blobs are written to
    pub upload_dir: String,

    /// Public URL prefix the blobs are served under
    pub public_base_url: String,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Cache visualization responses in memory
    pub enabled: bool,

    /// Upper bound on cached responses
    pub max_entries: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SPATIALGPT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SPATIALGPT_ prefix)
            .add_source(
                Environment::with_prefix("SPATIALGPT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Defaults only, without files or environment
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("test")?.build()?.try_deserialize()
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("log.json", false)?
            .set_default("llm.api_key", "")?
            .set_default(
                "llm.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("llm.chat_model", "gemini-1.5-flash-002")?
            .set_default("llm.large_model", "gemini-1.5-pro-002")?
            .set_default("llm.max_steps", 5)?
            .set_default("open_meteo.forecast_url", "https://api.open-meteo.com/v1/forecast")?
            .set_default(
                "open_meteo.archive_url",
                "https://archive-api.open-meteo.com/v1/archive",
            )?
            .set_default(
                "open_meteo.air_quality_url",
                "https://air-quality-api.open-meteo.com/v1/air-quality",
            )?
            .set_default(
                "open_meteo.climate_url",
                "https://climate-api.open-meteo.com/v1/climate",
            )?
            .set_default(
                "open_meteo.marine_url",
                "https://marine-api.open-meteo.com/v1/marine",
            )?
            .set_default("open_meteo.flood_url", "https://flood-api.open-meteo.com/v1/flood")?
            .set_default(
                "open_meteo.ensemble_url",
                "https://ensemble-api.open-meteo.com/v1/ensemble",
            )?
            .set_default("geocoding.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("geocoding.user_agent", "SpatialGPT-App")?
            .set_default("overpass.base_url", "https://overpass-api.de/api/interpreter")?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.public_base_url", "http://localhost:3000/files")?
            .set_default("storage.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("cache.enabled", true)?
            .set_default("cache.max_entries", 256)
    }
}
