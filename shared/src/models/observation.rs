//! Historical weather observation models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

/// One recorded weather observation for a (city, calendar date) pair
///
/// Uniqueness invariant: at most one observation per (city, date). Writers
/// overwrite on conflict; the fusion engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub id: Uuid,
    pub city: String,
    pub date: NaiveDate,
    pub weather_label: String,
    pub temperature_c: f64,
    pub humidity_pct: Option<i32>,
    pub wind_speed: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an observation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ObservationInput {
    #[validate(length(min = 1))]
    pub city: String,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub weather_label: String,
    pub temperature_c: f64,
    #[validate(range(min = 0, max = 100))]
    pub humidity_pct: Option<i32>,
    #[validate(range(min = 0.0))]
    pub wind_speed: Option<f64>,
}

/// One persisted probability row, keyed by (city, month, day, weather_label)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyProbability {
    pub city: String,
    pub month: u32,
    pub day: u32,
    pub weather_label: String,
    pub probability: f64,
    pub sample_count: i64,
}

/// The full label distribution for one (city, month, day) key
///
/// `sample_count == 0` means no observation exists for that calendar day;
/// callers must treat it as a first-class outcome, never a guess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyDistribution {
    pub city: String,
    pub month: u32,
    pub day: u32,
    /// Label -> probability; BTreeMap keeps iteration order deterministic
    pub probabilities: BTreeMap<String, f64>,
    pub most_likely: Option<String>,
    /// Probability mass behind the most likely label
    pub confidence: f64,
    pub sample_count: i64,
}

impl DailyDistribution {
    /// The documented zero-sample result for a key with no observations
    pub fn zero_sample(city: &str, month: u32, day: u32) -> Self {
        Self {
            city: city.to_string(),
            month,
            day,
            probabilities: BTreeMap::new(),
            most_likely: None,
            confidence: 0.0,
            sample_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}
