//! Configuration management for the Route Weather Advisory core
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RWA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Observation store configuration
    pub database: DatabaseConfig,

    /// Prediction fusion configuration
    pub fusion: FusionConfig,

    /// Statistical estimator configuration
    pub estimator: EstimatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; when absent the in-memory adapter is used
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

/// Named strategy for reconciling the weather estimators
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FusionPolicy {
    /// Historical observations only; absence of data is surfaced as-is
    #[default]
    HistoricalOnly,
    /// Legacy policy blending the rule model with the statistical estimator
    RuleMlBlend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FusionConfig {
    pub policy: FusionPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EstimatorConfig {
    /// Train the classifier/regressor pair at startup; when disabled the
    /// blend policy degrades to the rule-model-only path
    pub enabled: bool,

    /// First year of the synthetic training grid
    pub train_from_year: i32,

    /// Last year (inclusive) of the synthetic training grid
    pub train_to_year: i32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let environment = std::env::var("RWA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("fusion.policy", "historical_only")?
            .set_default("estimator.enabled", true)?
            .set_default("estimator.train_from_year", 2020)?
            .set_default("estimator.train_to_year", 2024)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RWA_ prefix)
            .add_source(
                Environment::with_prefix("RWA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                min_connections: 2,
            },
            fusion: FusionConfig {
                policy: FusionPolicy::HistoricalOnly,
            },
            estimator: EstimatorConfig {
                enabled: true,
                train_from_year: 2020,
                train_to_year: 2024,
            },
        }
    }
}
