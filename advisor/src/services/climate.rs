//! Deterministic geography/climate rule model
//!
//! Produces a baseline (weather label, temperature) pair from latitude,
//! elevation, climate zone, and day of year. The probabilistic branches in
//! the label cascade are driven by a PRNG seeded from the inputs, so the
//! model is a pure function: identical inputs always yield identical
//! outputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::{Hash, Hasher};

use shared::{labels, ClimateZone, GeoCity};

/// Baseline prediction from the rule cascade
#[derive(Debug, Clone, PartialEq)]
pub struct RulePrediction {
    pub weather_label: String,
    pub temperature_c: f64,
}

/// Seasonal/geographic formula model
#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateRuleModel;

impl ClimateRuleModel {
    pub fn new() -> Self {
        Self
    }

    /// Predict for a catalog city
    pub fn predict(&self, city: &GeoCity, month: u32, day_of_year: u32) -> RulePrediction {
        self.predict_at(
            city.latitude,
            city.longitude,
            city.elevation_m,
            city.climate_zone,
            month,
            day_of_year,
        )
    }

    /// Predict from raw geographic inputs
    pub fn predict_at(
        &self,
        latitude: f64,
        longitude: f64,
        elevation_m: f64,
        zone: ClimateZone,
        month: u32,
        day_of_year: u32,
    ) -> RulePrediction {
        let temperature_c = self.temperature_at(latitude, elevation_m, zone, day_of_year);
        let weather_label =
            self.label_at(latitude, longitude, zone, month, day_of_year, temperature_c);
        RulePrediction {
            weather_label,
            temperature_c,
        }
    }

    /// Seasonal sinusoid plus latitude, elevation, and zone corrections
    fn temperature_at(
        &self,
        latitude: f64,
        elevation_m: f64,
        zone: ClimateZone,
        day_of_year: u32,
    ) -> f64 {
        let base = 15.0
            + 10.0 * (2.0 * std::f64::consts::PI * (day_of_year as f64 - 80.0) / 365.0).sin();
        let lat_effect = (latitude - 40.0) * -0.5;
        let elevation_effect = elevation_m * -0.006;
        let temp = base + lat_effect + elevation_effect + zone_temperature_offset(zone);
        (temp * 10.0).round() / 10.0
    }

    /// Prioritized label cascade: zone overrides, then temperature/month
    /// thresholds, then the seeded probabilistic seasonal split
    fn label_at(
        &self,
        latitude: f64,
        longitude: f64,
        zone: ClimateZone,
        month: u32,
        day_of_year: u32,
        temperature_c: f64,
    ) -> String {
        let winter = matches!(month, 12 | 1 | 2);
        let summer = matches!(month, 6 | 7 | 8);

        let label = if zone.is_continental_highland() && matches!(month, 12 | 1 | 2 | 3) {
            labels::SNOW
        } else if zone == ClimateZone::BlackSea {
            let mut rng = self.branch_rng(latitude, longitude, month, day_of_year);
            if rng.gen::<f64>() > 0.3 {
                labels::RAIN
            } else {
                labels::CLEAR
            }
        } else if zone == ClimateZone::Mediterranean && matches!(month, 6..=9) {
            labels::CLEAR
        } else if temperature_c < 5.0 && winter {
            labels::SNOW
        } else if temperature_c > 25.0 && summer {
            labels::CLEAR
        } else if summer {
            // 80% clear, 20% rain
            let mut rng = self.branch_rng(latitude, longitude, month, day_of_year);
            if rng.gen::<f64>() > 0.2 {
                labels::CLEAR
            } else {
                labels::RAIN
            }
        } else if winter {
            // 70% snow, 30% rain
            let mut rng = self.branch_rng(latitude, longitude, month, day_of_year);
            if rng.gen::<f64>() > 0.3 {
                labels::SNOW
            } else {
                labels::RAIN
            }
        } else {
            // Spring/autumn: 60% rain, 40% clear
            let mut rng = self.branch_rng(latitude, longitude, month, day_of_year);
            if rng.gen::<f64>() > 0.4 {
                labels::RAIN
            } else {
                labels::CLEAR
            }
        };

        label.to_string()
    }

    /// RNG seeded from the prediction inputs; keyed per (location, date)
    fn branch_rng(&self, latitude: f64, longitude: f64, month: u32, day_of_year: u32) -> StdRng {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        latitude.to_bits().hash(&mut hasher);
        longitude.to_bits().hash(&mut hasher);
        month.hash(&mut hasher);
        day_of_year.hash(&mut hasher);
        StdRng::seed_from_u64(hasher.finish())
    }
}

/// Fixed per-zone temperature offset table
fn zone_temperature_offset(zone: ClimateZone) -> f64 {
    match zone {
        ClimateZone::Mediterranean => 3.0,
        ClimateZone::Aegean => 2.0,
        ClimateZone::Marmara => 0.0,
        ClimateZone::CentralAnatolia => -2.0,
        ClimateZone::BlackSea => 1.0,
        ClimateZone::EasternAnatolia => -5.0,
        ClimateZone::SoutheastAnatolia => 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_yield_identical_outputs() {
        let model = ClimateRuleModel::new();
        let a = model.predict_at(41.0, 39.7, 0.0, ClimateZone::BlackSea, 4, 100);
        let b = model.predict_at(41.0, 39.7, 0.0, ClimateZone::BlackSea, 4, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn continental_highland_forces_winter_snow() {
        let model = ClimateRuleModel::new();
        for month in [12, 1, 2, 3] {
            let p = model.predict_at(40.6, 43.1, 1768.0, ClimateZone::EasternAnatolia, month, 10);
            assert_eq!(p.weather_label, labels::SNOW);
        }
    }

    #[test]
    fn mediterranean_summer_is_clear() {
        let model = ClimateRuleModel::new();
        let p = model.predict_at(36.9, 30.7, 30.0, ClimateZone::Mediterranean, 7, 196);
        assert_eq!(p.weather_label, labels::CLEAR);
    }

    #[test]
    fn elevation_and_latitude_cool_the_estimate() {
        let model = ClimateRuleModel::new();
        let low = model.temperature_at(36.0, 0.0, ClimateZone::Marmara, 200);
        let high = model.temperature_at(41.0, 1500.0, ClimateZone::Marmara, 200);
        assert!(high < low);
    }
}
