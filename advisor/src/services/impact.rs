//! Impact resolver
//!
//! Pure mapping from a forecast and calendar context to traffic and
//! route-duration multipliers. All factors are independent multiplicative
//! terms, so application order does not matter; the factor table itself is
//! fixed for output compatibility with the route optimizer.

use chrono::{Datelike, NaiveDate, Weekday};

use shared::{labels, PopulationTier};

/// Months with the summer-holiday traffic pattern
const SUMMER_HOLIDAY_MONTHS: [u32; 2] = [7, 8];

/// Inputs for one impact resolution
#[derive(Debug, Clone, Copy)]
pub struct ImpactInput<'a> {
    pub weather_label: &'a str,
    pub population: u64,
    pub is_tourism_city: bool,
    pub weekday: Weekday,
    pub month: u32,
    pub is_holiday: bool,
}

impl<'a> ImpactInput<'a> {
    pub fn for_date(
        weather_label: &'a str,
        population: u64,
        is_tourism_city: bool,
        date: NaiveDate,
        is_holiday: bool,
    ) -> Self {
        Self {
            weather_label,
            population,
            is_tourism_city,
            weekday: date.weekday(),
            month: date.month(),
            is_holiday,
        }
    }
}

/// Resolved multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub traffic_multiplier: f64,
    pub duration_multiplier: f64,
}

/// Stateless resolver over the fixed factor tables
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactResolver;

impl ImpactResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, input: &ImpactInput<'_>) -> Impact {
        Impact {
            traffic_multiplier: self.traffic_multiplier(input),
            duration_multiplier: self.duration_multiplier(input.weather_label),
        }
    }

    /// Base 1.0 scaled by population tier, weekend, and summer factors
    pub fn traffic_multiplier(&self, input: &ImpactInput<'_>) -> f64 {
        let mut multiplier = 1.0_f64;

        multiplier *= match PopulationTier::of(input.population) {
            PopulationTier::OverFiveMillion => 1.5,
            PopulationTier::OverTwoMillion => 1.3,
            PopulationTier::OverOneMillion => 1.2,
            PopulationTier::Standard => 1.0,
        };

        if matches!(input.weekday, Weekday::Sat | Weekday::Sun) {
            multiplier *= if input.is_tourism_city { 1.4 } else { 0.7 };
        }

        if SUMMER_HOLIDAY_MONTHS.contains(&input.month) {
            multiplier *= if input.is_tourism_city { 1.6 } else { 0.8 };
        }

        (multiplier * 100.0).round() / 100.0
    }

    /// Fixed weather-label-to-duration lookup
    pub fn duration_multiplier(&self, weather_label: &str) -> f64 {
        match weather_label {
            labels::SNOW => 1.15,
            labels::RAIN => 1.10,
            labels::FOG => 1.08,
            _ => 1.0,
        }
    }

    /// Human-readable traffic commentary for an advisory
    pub fn traffic_explanation(
        &self,
        city: &str,
        multiplier: f64,
        is_holiday: bool,
        holiday_name: Option<&str>,
    ) -> String {
        match (is_holiday, holiday_name) {
            (true, Some(name)) if multiplier > 1.5 => {
                format!("Heavy holiday traffic expected in {city} due to {name}")
            }
            (true, Some(name)) if multiplier < 0.7 => {
                format!("Reduced traffic expected in {city} due to {name}")
            }
            (true, Some(name)) => {
                format!("Normal traffic expected in {city} during {name}")
            }
            _ if multiplier > 1.5 => format!("Heavy traffic expected in {city}"),
            _ if multiplier < 0.7 => format!("Light traffic expected in {city}"),
            _ => format!("Normal traffic density in {city}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekday_input(population: u64) -> ImpactInput<'static> {
        ImpactInput {
            weather_label: labels::CLEAR,
            population,
            is_tourism_city: false,
            weekday: Weekday::Wed,
            month: 3,
            is_holiday: false,
        }
    }

    #[test]
    fn population_tiers_scale_traffic() {
        let resolver = ImpactResolver::new();
        assert_eq!(resolver.traffic_multiplier(&weekday_input(500_000)), 1.0);
        assert_eq!(resolver.traffic_multiplier(&weekday_input(1_500_000)), 1.2);
        assert_eq!(resolver.traffic_multiplier(&weekday_input(2_500_000)), 1.3);
        assert_eq!(resolver.traffic_multiplier(&weekday_input(6_000_000)), 1.5);
    }

    #[test]
    fn weekend_splits_tourism_from_other_cities() {
        let resolver = ImpactResolver::new();
        let mut tourism = weekday_input(500_000);
        tourism.weekday = Weekday::Sat;
        tourism.is_tourism_city = true;
        assert_eq!(resolver.traffic_multiplier(&tourism), 1.4);

        let mut other = weekday_input(500_000);
        other.weekday = Weekday::Sun;
        assert_eq!(resolver.traffic_multiplier(&other), 0.7);
    }

    #[test]
    fn summer_boosts_tourism_cities() {
        let resolver = ImpactResolver::new();
        let mut input = weekday_input(500_000);
        input.month = 8;
        input.is_tourism_city = true;
        assert_eq!(resolver.traffic_multiplier(&input), 1.6);

        input.is_tourism_city = false;
        assert_eq!(resolver.traffic_multiplier(&input), 0.8);
    }

    #[test]
    fn duration_table_matches_fixed_lookup() {
        let resolver = ImpactResolver::new();
        assert_eq!(resolver.duration_multiplier(labels::SNOW), 1.15);
        assert_eq!(resolver.duration_multiplier(labels::RAIN), 1.10);
        assert_eq!(resolver.duration_multiplier(labels::FOG), 1.08);
        assert_eq!(resolver.duration_multiplier(labels::CLEAR), 1.0);
        assert_eq!(resolver.duration_multiplier("drizzle"), 1.0);
    }
}
