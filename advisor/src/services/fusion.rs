//! Prediction fusion engine
//!
//! Reconciles the three weather estimators into one forecast per
//! (city, month, day) with an explicit confidence and explanation. The
//! policy is a named configuration choice: `HistoricalOnly` (primary) never
//! falls back when real observations are missing, while the legacy
//! `RuleMlBlend` arbitrates between the rule model and the statistical
//! estimator. The two are never mixed within one forecast.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::GeographyCatalog;
use crate::config::FusionPolicy;
use crate::services::climate::ClimateRuleModel;
use crate::services::estimator::{FeatureVector, StatisticalEstimator};
use crate::store::ObservationStore;
use shared::{labels, Forecast, GeoCity};

/// Merges rule-model, estimator, and historical outputs into one Forecast
pub struct PredictionFusionEngine {
    catalog: Arc<GeographyCatalog>,
    rule_model: ClimateRuleModel,
    estimator: Option<Arc<StatisticalEstimator>>,
    store: Arc<ObservationStore>,
    policy: FusionPolicy,
}

impl PredictionFusionEngine {
    pub fn new(
        catalog: Arc<GeographyCatalog>,
        rule_model: ClimateRuleModel,
        estimator: Option<Arc<StatisticalEstimator>>,
        store: Arc<ObservationStore>,
        policy: FusionPolicy,
    ) -> Self {
        Self {
            catalog,
            rule_model,
            estimator,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> FusionPolicy {
        self.policy
    }

    /// One forecast per (city, month, day); never fails, always degrades
    pub async fn forecast(&self, city: &str, month: u32, day: u32) -> Forecast {
        let Some(geo) = self.catalog.get(city) else {
            debug!(city, "City not in catalog; returning default forecast");
            return Forecast::degraded_default(city, month, day);
        };

        match self.policy {
            FusionPolicy::HistoricalOnly => self.historical_forecast(geo, month, day).await,
            FusionPolicy::RuleMlBlend => self.blend_forecast(geo, month, day),
        }
    }

    /// Primary policy: real observations or an explicit no-data answer
    async fn historical_forecast(&self, geo: &GeoCity, month: u32, day: u32) -> Forecast {
        let dist = self.store.get_daily_probability(&geo.name, month, day).await;

        if dist.is_empty() {
            // Absence of data is a first-class outcome: no rule-model or
            // estimator fallback under this policy
            return Forecast {
                city: geo.name.clone(),
                month,
                day,
                weather_label: labels::NO_DATA.to_string(),
                confidence: 0.0,
                avg_temperature: 0.0,
                climate_zone: Some(geo.climate_zone),
                explanation: format!(
                    "No weather observation recorded for {} on {:02}-{:02} in the lookback window",
                    geo.name, month, day
                ),
                weather_probabilities: None,
                sample_count: Some(0),
            };
        }

        let label = dist
            .most_likely
            .clone()
            .unwrap_or_else(|| labels::NO_DATA.to_string());

        // Mean temperature over the contributing observations; one
        // observation per (city, date) makes sample_count the year count
        let examples = self
            .store
            .get_recent_examples(&geo.name, month, day, dist.sample_count.max(5))
            .await;

        // Temperature detail comes from the same observations as the label.
        // If they cannot be loaded it degrades like the zero-sample case;
        // the rule model does not fill in under this policy.
        let (avg_temperature, temperature_note) = if examples.is_empty() {
            (0.0, "Temperature detail unavailable".to_string())
        } else {
            let sum: f64 = examples.iter().map(|o| o.temperature_c).sum();
            let avg = ((sum / examples.len() as f64) * 10.0).round() / 10.0;
            (avg, format!("Average temperature {avg:.1}°C"))
        };

        let explanation = format!(
            "{}: {} was the most frequent weather on {:02}-{:02} across {} recorded year(s) ({:.0}% probability). {}",
            geo.name,
            label,
            month,
            day,
            dist.sample_count,
            dist.confidence * 100.0,
            temperature_note
        );

        Forecast {
            city: geo.name.clone(),
            month,
            day,
            weather_label: label,
            confidence: dist.confidence,
            avg_temperature,
            climate_zone: Some(geo.climate_zone),
            explanation,
            weather_probabilities: Some(dist.probabilities),
            sample_count: Some(dist.sample_count),
        }
    }

    /// Legacy policy: arbitrate between rule model and estimator
    fn blend_forecast(&self, geo: &GeoCity, month: u32, day: u32) -> Forecast {
        let doy = day_of_year(month, day);
        let rule = self.rule_model.predict(geo, month, doy);

        // The rule model's hard geographic constraint wins outright
        if geo.climate_zone.is_continental_highland() && matches!(month, 12 | 1 | 2 | 3) {
            return self.blend_result(
                geo,
                month,
                day,
                rule.weather_label.clone(),
                rule.temperature_c,
                0.95,
                format!(
                    "Rule model forecast for {}: {} expected in month {} ({} winter conditions)",
                    geo.name,
                    rule.weather_label,
                    month,
                    geo.climate_zone.name()
                ),
            );
        }

        let ml = self.estimator.as_ref().and_then(|estimator| {
            let features = FeatureVector {
                latitude: geo.latitude,
                longitude: geo.longitude,
                elevation_m: geo.elevation_m,
                population: geo.population as f64,
                month: month as f64,
                // No year in the query; assume Monday like the original grid
                day_of_week: 0.0,
                day_of_year: doy as f64,
            };
            match estimator.predict(&features) {
                Ok(pred) => Some(pred),
                Err(e) => {
                    warn!(city = %geo.name, error = %e, "Estimator inference failed; using rule model only");
                    None
                }
            }
        });

        match ml {
            Some(ml) if ml.weather_label == rule.weather_label => {
                let temp = ((rule.temperature_c + ml.temperature_c) / 2.0 * 10.0).round() / 10.0;
                self.blend_result(
                    geo,
                    month,
                    day,
                    ml.weather_label.clone(),
                    temp,
                    0.90,
                    format!(
                        "Rule model and statistical estimator agree: {} expected in {} in month {}",
                        ml.weather_label, geo.name, month
                    ),
                )
            }
            Some(ml) => self.blend_result(
                geo,
                month,
                day,
                rule.weather_label.clone(),
                rule.temperature_c,
                0.85,
                format!(
                    "Rule model preferred for {}: {} in month {} (estimator disagreed with {})",
                    geo.name, rule.weather_label, month, ml.weather_label
                ),
            ),
            None => self.blend_result(
                geo,
                month,
                day,
                rule.weather_label.clone(),
                rule.temperature_c,
                0.85,
                format!(
                    "Rule model forecast for {}: {} in month {} (statistical estimator unavailable)",
                    geo.name, rule.weather_label, month
                ),
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn blend_result(
        &self,
        geo: &GeoCity,
        month: u32,
        day: u32,
        weather_label: String,
        avg_temperature: f64,
        confidence: f64,
        explanation: String,
    ) -> Forecast {
        Forecast {
            city: geo.name.clone(),
            month,
            day,
            weather_label,
            confidence,
            avg_temperature,
            climate_zone: Some(geo.climate_zone),
            explanation,
            weather_probabilities: None,
            sample_count: None,
        }
    }
}

/// Approximate ordinal for a (month, day) key without a year
///
/// Calendar-invalid keys like (2, 30) fall back to the coarse month grid the
/// legacy system used; under the historical policy they simply never match
/// an observation.
fn day_of_year(month: u32, day: u32) -> u32 {
    chrono::NaiveDate::from_ymd_opt(2023, month, day)
        .map(|d| chrono::Datelike::ordinal(&d))
        .unwrap_or(month * 30)
}
