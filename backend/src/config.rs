//! Configuration management for the GeoRisk server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with GEORISK__ prefix

use std::path::PathBuf;
use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{AnalysisConfig, EngineSettings, ScoringConfig, ThresholdConfig, WeightConfig};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Measurement backend configuration
    pub provider: ProviderConfig,

    /// Static feature catalogs
    pub catalogs: CatalogConfig,

    /// Analysis window and query geometry
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Hazard thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Landslide factor weights
    #[serde(default)]
    pub weights: WeightConfig,

    /// Scoring model and failure posture
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Base URL of the geospatial measurement service
    pub endpoint: String,

    /// Bearer token for the measurement service
    #[serde(default)]
    pub api_key: String,

    /// Timeout applied to every provider call, in seconds
    pub timeout_secs: u64,

    /// Maximum provider calls in flight for one request
    pub max_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Directory holding the catalog CSV files
    pub data_dir: PathBuf,

    pub faults_file: String,
    pub fires_file: String,
    pub volcanoes_file: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GEORISK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("provider.endpoint", "http://localhost:8080/v1")?
            .set_default("provider.timeout_secs", 20)?
            .set_default("provider.max_concurrency", 8)?
            .set_default("catalogs.data_dir", "data")?
            .set_default("catalogs.faults_file", "deslizamiento_catastro_chile.csv")?
            .set_default("catalogs.fires_file", "R_INCENDIOS.csv")?
            .set_default("catalogs.volcanoes_file", "volcanes.csv")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GEORISK__ prefix)
            .add_source(
                Environment::with_prefix("GEORISK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Process-wide engine defaults
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            thresholds: self.thresholds.clone(),
            weights: self.weights.clone(),
            analysis: self.analysis.clone(),
            scoring: self.scoring.clone(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1".to_string(),
            api_key: String::new(),
            timeout_secs: 20,
            max_concurrency: 8,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            faults_file: "deslizamiento_catastro_chile.csv".to_string(),
            fires_file: "R_INCENDIOS.csv".to_string(),
            volcanoes_file: "volcanes.csv".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            catalogs: CatalogConfig::default(),
            analysis: AnalysisConfig::default(),
            thresholds: ThresholdConfig::default(),
            weights: WeightConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}
