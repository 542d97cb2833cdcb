//! Forecast and route advisory models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ClimateZone;

/// Controlled weather-label vocabulary
///
/// Observations carry an open vocabulary; everything the advisory core
/// produces itself is drawn from these labels so the impact resolver can
/// always score it.
pub mod labels {
    pub const CLEAR: &str = "clear";
    pub const RAIN: &str = "rain";
    pub const SNOW: &str = "snow";
    pub const FOG: &str = "fog";
    pub const STORM: &str = "storm";
    pub const WIND: &str = "wind";
    pub const CLOUDY: &str = "cloudy";

    /// Sentinel returned when no historical observation exists for a day
    pub const NO_DATA: &str = "no-data";
}

/// One fused weather forecast for a (city, month, day) key
///
/// Transient value object; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub city: String,
    pub month: u32,
    pub day: u32,
    pub weather_label: String,
    /// Probability mass behind the chosen label, in [0, 1]
    pub confidence: f64,
    pub avg_temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate_zone: Option<ClimateZone>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_probabilities: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<i64>,
}

impl Forecast {
    /// Degraded default used when a city is unknown or a per-city
    /// prediction fails inside a route request
    pub fn degraded_default(city: &str, month: u32, day: u32) -> Self {
        Self {
            city: city.to_string(),
            month,
            day,
            weather_label: labels::CLEAR.to_string(),
            confidence: 0.6,
            avg_temperature: 20.0,
            climate_zone: None,
            explanation: format!("Default forecast for {city}"),
            weather_probabilities: None,
            sample_count: None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.weather_label == labels::NO_DATA
    }
}

/// Per-city advisory: forecast plus derived impact multipliers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityAdvisory {
    pub forecast: Forecast,
    pub date: NaiveDate,
    pub traffic_multiplier: f64,
    pub duration_multiplier: f64,
    pub is_holiday: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
    pub traffic_explanation: String,
}

/// Route-level aggregate over the per-city advisories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    pub total_cities: usize,
    pub avg_confidence: f64,
    pub is_holiday_period: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
    /// Distinct weather labels across the route, sorted
    pub weather_conditions: Vec<String>,
    /// Distinct climate zone names across the route, sorted
    pub climate_zones: Vec<String>,
    pub avg_traffic_multiplier: f64,
    pub avg_duration_impact: f64,
}

/// The advisory for one trip date over an ordered city list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteAdvisory {
    pub date: NaiveDate,
    pub advisories: Vec<CityAdvisory>,
    pub route_summary: RouteSummary,
}
