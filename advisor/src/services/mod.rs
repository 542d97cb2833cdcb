//! Forecasting and routing services for the Route Weather Advisor

pub mod advisor;
pub mod climate;
pub mod estimator;
pub mod fusion;
pub mod impact;

pub use advisor::RouteWeatherAdvisor;
pub use climate::{ClimateRuleModel, RulePrediction};
pub use estimator::{EstimatorPrediction, FeatureVector, StatisticalEstimator};
pub use fusion::PredictionFusionEngine;
pub use impact::{Impact, ImpactInput, ImpactResolver};
