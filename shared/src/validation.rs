//! Validation utilities for the Route Weather Advisory system
//!
//! Malformed caller input is the one failure class that surfaces to callers
//! before any model runs; everything here exists to catch it early.

use serde::Deserialize;
use validator::Validate;

/// Tolerance for probability-sum checks on daily distributions
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Query for a single-city forecast
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForecastQuery {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 1, max = 31))]
    pub day: u32,
}

/// Query for a route advisory over an ordered city list
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteQuery {
    #[validate(length(min = 1))]
    pub cities: Vec<String>,
    /// ISO-8601 calendar date, e.g. "2025-07-15"
    #[validate(length(min = 1))]
    pub date: String,
    pub overrides: Option<Vec<String>>,
}

/// Check that a (month, day) pair is a plausible calendar key
pub fn is_valid_month_day(month: u32, day: u32) -> bool {
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Check that a label distribution is normalized within tolerance
///
/// An empty distribution (the zero-sample case) is considered valid.
pub fn probabilities_normalized<'a, I>(probabilities: I) -> bool
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut sum = 0.0;
    let mut any = false;
    for p in probabilities {
        any = true;
        sum += p;
    }
    !any || (sum - 1.0).abs() <= PROBABILITY_TOLERANCE
}
