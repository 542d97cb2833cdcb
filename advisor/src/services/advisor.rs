//! Route weather advisor
//!
//! Top-level orchestration: per-city fusion forecasts (or caller-supplied
//! overrides) across one trip date, impact resolution, holiday lookup, and
//! the route-level summary. Per-city failures are isolated; a single city
//! can only ever degrade its own advisory.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::catalog::GeographyCatalog;
use crate::error::{AppError, AppResult};
use crate::holidays::HolidayCalendar;
use crate::services::fusion::PredictionFusionEngine;
use crate::services::impact::{ImpactInput, ImpactResolver};
use crate::store::ObservationStore;
use shared::{
    labels, CityAdvisory, Forecast, ForecastQuery, ObservationInput, RouteAdvisory, RouteQuery,
    RouteSummary,
};

/// Confidence attached to caller-supplied weather overrides
const OVERRIDE_CONFIDENCE: f64 = 0.95;

/// Fixed label -> temperature table for overridden forecasts
fn override_temperature(label: &str) -> f64 {
    match label {
        labels::SNOW => 0.0,
        labels::FOG => 5.0,
        labels::RAIN => 8.0,
        labels::STORM | labels::WIND => 10.0,
        labels::CLOUDY => 12.0,
        _ => 20.0,
    }
}

/// Orchestrates fusion + impact across a route
pub struct RouteWeatherAdvisor {
    catalog: Arc<GeographyCatalog>,
    fusion: PredictionFusionEngine,
    impact: ImpactResolver,
    holidays: HolidayCalendar,
    store: Arc<ObservationStore>,
}

impl RouteWeatherAdvisor {
    pub fn new(
        catalog: Arc<GeographyCatalog>,
        fusion: PredictionFusionEngine,
        impact: ImpactResolver,
        holidays: HolidayCalendar,
        store: Arc<ObservationStore>,
    ) -> Self {
        Self {
            catalog,
            fusion,
            impact,
            holidays,
            store,
        }
    }

    /// Fused forecast for one city and calendar day
    pub async fn forecast(&self, city: &str, month: u32, day: u32) -> AppResult<Forecast> {
        ForecastQuery {
            city: city.to_string(),
            month,
            day,
        }
        .validate()?;

        Ok(self.fusion.forecast(city, month, day).await)
    }

    /// Advisory for an ordered city list on one trip date
    ///
    /// `overrides` are positional weather labels; a shorter list falls back
    /// to its first entry for the remaining cities.
    pub async fn route_forecast(
        &self,
        cities: &[String],
        date: &str,
        overrides: Option<&[String]>,
    ) -> AppResult<RouteAdvisory> {
        RouteQuery {
            cities: cities.to_vec(),
            date: date.to_string(),
            overrides: overrides.map(|o| o.to_vec()),
        }
        .validate()?;

        let trip_date = parse_trip_date(date)?;
        let (month, day) = (trip_date.month(), trip_date.day());
        let holiday_name = self.holidays.holiday_on(trip_date);
        let is_holiday = holiday_name.is_some();

        info!(
            cities = cities.len(),
            %trip_date,
            overridden = overrides.map(|o| !o.is_empty()).unwrap_or(false),
            "Building route advisory"
        );

        let mut advisories = Vec::with_capacity(cities.len());
        for (index, city) in cities.iter().enumerate() {
            let override_label = overrides.and_then(|o| o.get(index).or_else(|| o.first()));

            let forecast = match override_label {
                Some(label) => {
                    debug!(city, label, "Applying caller weather override");
                    self.overridden_forecast(city, month, day, label)
                }
                None => self.fusion.forecast(city, month, day).await,
            };

            let (population, is_tourism) = self
                .catalog
                .get(city)
                .map(|c| (c.population, c.is_tourism_city))
                .unwrap_or((0, false));

            let impact = self.impact.resolve(&ImpactInput::for_date(
                &forecast.weather_label,
                population,
                is_tourism,
                trip_date,
                is_holiday,
            ));
            let traffic_explanation = self.impact.traffic_explanation(
                &forecast.city,
                impact.traffic_multiplier,
                is_holiday,
                holiday_name,
            );

            advisories.push(CityAdvisory {
                forecast,
                date: trip_date,
                traffic_multiplier: impact.traffic_multiplier,
                duration_multiplier: impact.duration_multiplier,
                is_holiday,
                holiday_name: holiday_name.map(String::from),
                traffic_explanation,
            });
        }

        let route_summary = summarize(&advisories);
        Ok(RouteAdvisory {
            date: trip_date,
            advisories,
            route_summary,
        })
    }

    /// Convenience wrapper: forecast + traffic factor only
    pub async fn traffic_multiplier(&self, city: &str, date: &str) -> AppResult<f64> {
        let trip_date = parse_trip_date(date)?;
        let forecast = self
            .forecast(city, trip_date.month(), trip_date.day())
            .await?;

        let (population, is_tourism) = self
            .catalog
            .get(city)
            .map(|c| (c.population, c.is_tourism_city))
            .unwrap_or((0, false));

        Ok(self.impact.traffic_multiplier(&ImpactInput::for_date(
            &forecast.weather_label,
            population,
            is_tourism,
            trip_date,
            self.holidays.is_holiday(trip_date),
        )))
    }

    /// Write path for the data-collection job: store one observation and
    /// refresh the city's probability aggregates
    pub async fn record_and_aggregate(&self, input: ObservationInput) -> AppResult<()> {
        input.validate()?;
        self.store.record_observation(&input).await?;
        self.store.recompute_probabilities(&input.city).await?;
        Ok(())
    }

    /// Forecast bypassing the fusion engine entirely
    fn overridden_forecast(&self, city: &str, month: u32, day: u32, label: &str) -> Forecast {
        let climate_zone = self.catalog.get(city).map(|c| c.climate_zone);
        Forecast {
            city: city.to_string(),
            month,
            day,
            weather_label: label.to_string(),
            confidence: OVERRIDE_CONFIDENCE,
            avg_temperature: override_temperature(label),
            climate_zone,
            explanation: format!("Caller requested {label} weather for {city}"),
            weather_probabilities: None,
            sample_count: None,
        }
    }
}

/// ISO-8601 trip date; anything else is a validation failure raised before
/// any model runs
fn parse_trip_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::MalformedDate(date.to_string()))
}

fn summarize(advisories: &[CityAdvisory]) -> RouteSummary {
    let total = advisories.len();
    let n = total.max(1) as f64;

    let avg_confidence = advisories.iter().map(|a| a.forecast.confidence).sum::<f64>() / n;
    let avg_traffic_multiplier = advisories.iter().map(|a| a.traffic_multiplier).sum::<f64>() / n;
    let avg_duration_impact = advisories.iter().map(|a| a.duration_multiplier).sum::<f64>() / n;

    let weather_conditions: BTreeSet<String> = advisories
        .iter()
        .map(|a| a.forecast.weather_label.clone())
        .collect();
    let climate_zones: BTreeSet<String> = advisories
        .iter()
        .filter_map(|a| a.forecast.climate_zone.map(|z| z.name().to_string()))
        .collect();

    RouteSummary {
        total_cities: total,
        avg_confidence,
        is_holiday_period: advisories.iter().any(|a| a.is_holiday),
        holiday_name: advisories.iter().find_map(|a| a.holiday_name.clone()),
        weather_conditions: weather_conditions.into_iter().collect(),
        climate_zones: climate_zones.into_iter().collect(),
        avg_traffic_multiplier,
        avg_duration_impact,
    }
}
