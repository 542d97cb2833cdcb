//! Route Weather Advisor
//!
//! Prediction-fusion engine for route planning across Turkish cities:
//! climatological rules, an optional statistical estimator, and recorded
//! observations are merged into per-city forecasts, then combined with
//! traffic and duration impact factors into route-level advisories.

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod catalog;
pub mod config;
pub mod error;
pub mod holidays;
pub mod services;
pub mod store;

pub use config::{Config, FusionPolicy};
pub use error::{AppError, AppResult};

use catalog::GeographyCatalog;
use holidays::HolidayCalendar;
use services::{
    ClimateRuleModel, ImpactResolver, PredictionFusionEngine, RouteWeatherAdvisor,
    StatisticalEstimator,
};
use store::{ObservationStore, StorageBackend};

/// Initialize tracing from `RUST_LOG`, with a sensible default filter
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_weather_advisor=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Fully wired application state
pub struct AdvisorContext {
    pub config: Arc<Config>,
    pub catalog: Arc<GeographyCatalog>,
    pub store: Arc<ObservationStore>,
    advisor: RouteWeatherAdvisor,
}

impl AdvisorContext {
    /// Resolve the storage backend from configuration, train the estimator
    /// if enabled, and wire every service together.
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let backend = store::resolve_backend(&config.database).await?;
        Self::with_backend(config, backend)
    }

    /// Same wiring with a caller-supplied backend; used by tests
    pub fn with_backend(config: Config, backend: Box<dyn StorageBackend>) -> AppResult<Self> {
        let config = Arc::new(config);
        let catalog = Arc::new(GeographyCatalog::builtin());
        let store = Arc::new(ObservationStore::new(backend));
        let rule_model = ClimateRuleModel::new();

        let estimator = if config.estimator.enabled {
            match StatisticalEstimator::train(
                &catalog,
                &rule_model,
                config.estimator.train_from_year,
                config.estimator.train_to_year,
            ) {
                Ok(model) => {
                    info!(
                        from_year = config.estimator.train_from_year,
                        to_year = config.estimator.train_to_year,
                        "Statistical estimator trained"
                    );
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!(error = %e, "Estimator training failed, continuing rule-only");
                    None
                }
            }
        } else {
            None
        };

        let fusion = PredictionFusionEngine::new(
            Arc::clone(&catalog),
            rule_model,
            estimator,
            Arc::clone(&store),
            config.fusion.policy,
        );
        let advisor = RouteWeatherAdvisor::new(
            Arc::clone(&catalog),
            fusion,
            ImpactResolver::new(),
            HolidayCalendar::new(),
            Arc::clone(&store),
        );

        Ok(Self {
            config,
            catalog,
            store,
            advisor,
        })
    }

    pub fn advisor(&self) -> &RouteWeatherAdvisor {
        &self.advisor
    }
}
