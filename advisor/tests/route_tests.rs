//! Route advisory integration tests
//!
//! Coverage for the route-level operations:
//! - per-city advisories with caller weather overrides
//! - holiday detection and traffic/duration factor application
//! - route summary aggregation
//! - input validation and storage-failure degradation

use async_trait::async_trait;
use chrono::NaiveDate;

use route_weather_advisor::config::{Config, FusionPolicy};
use route_weather_advisor::error::{AppError, AppResult};
use route_weather_advisor::store::{MemoryBackend, StorageBackend};
use route_weather_advisor::AdvisorContext;
use shared::{labels, DailyProbability, Observation, ObservationInput};

fn context() -> AdvisorContext {
    let mut config = Config::default();
    config.fusion.policy = FusionPolicy::HistoricalOnly;
    config.estimator.enabled = false;
    AdvisorContext::with_backend(config, Box::new(MemoryBackend::new()))
        .expect("context wiring failed")
}

fn cities(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ============================================================================
// Overrides
// ============================================================================

#[tokio::test]
async fn single_override_applies_to_every_city() {
    let ctx = context();
    let overrides = vec![labels::RAIN.to_string()];

    let advisory = ctx
        .advisor()
        .route_forecast(&cities(&["İstanbul", "Ankara"]), "2025-07-15", Some(&overrides))
        .await
        .unwrap();

    assert_eq!(advisory.advisories.len(), 2);
    for city_advisory in &advisory.advisories {
        assert_eq!(city_advisory.forecast.weather_label, labels::RAIN);
        assert_eq!(city_advisory.forecast.confidence, 0.95);
        assert_eq!(city_advisory.forecast.avg_temperature, 8.0);
        assert_eq!(city_advisory.duration_multiplier, 1.10);
    }
    assert_eq!(advisory.route_summary.weather_conditions, vec![labels::RAIN]);
    assert!((advisory.route_summary.avg_confidence - 0.95).abs() < 1e-9);
}

#[tokio::test]
async fn positional_overrides_map_city_by_city() {
    let ctx = context();
    let overrides = vec![labels::SNOW.to_string(), labels::CLEAR.to_string()];

    let advisory = ctx
        .advisor()
        .route_forecast(&cities(&["Kars", "Antalya"]), "2025-02-10", Some(&overrides))
        .await
        .unwrap();

    assert_eq!(advisory.advisories[0].forecast.weather_label, labels::SNOW);
    assert_eq!(advisory.advisories[0].forecast.avg_temperature, 0.0);
    assert_eq!(advisory.advisories[0].duration_multiplier, 1.15);
    assert_eq!(advisory.advisories[1].forecast.weather_label, labels::CLEAR);
    assert_eq!(advisory.advisories[1].forecast.avg_temperature, 20.0);
    assert_eq!(advisory.advisories[1].duration_multiplier, 1.0);
}

// ============================================================================
// Holidays and impact factors
// ============================================================================

#[tokio::test]
async fn fixed_holiday_is_detected_on_route_date() {
    let ctx = context();

    let advisory = ctx
        .advisor()
        .route_forecast(&cities(&["İstanbul"]), "2025-07-15", None)
        .await
        .unwrap();

    assert!(advisory.route_summary.is_holiday_period);
    assert_eq!(
        advisory.route_summary.holiday_name.as_deref(),
        Some("Democracy and National Unity Day")
    );
    assert!(advisory.advisories[0].is_holiday);
}

#[tokio::test]
async fn ordinary_weekday_is_not_a_holiday() {
    let ctx = context();

    let advisory = ctx
        .advisor()
        .route_forecast(&cities(&["İstanbul"]), "2025-03-05", None)
        .await
        .unwrap();

    assert!(!advisory.route_summary.is_holiday_period);
    assert!(advisory.route_summary.holiday_name.is_none());
}

#[tokio::test]
async fn traffic_multiplier_reflects_population_and_season() {
    let ctx = context();

    // 2025-03-05 is a Wednesday outside the summer months
    let metropolitan = ctx
        .advisor()
        .traffic_multiplier("İstanbul", "2025-03-05")
        .await
        .unwrap();
    assert_eq!(metropolitan, 1.5);

    let small = ctx
        .advisor()
        .traffic_multiplier("Kars", "2025-03-05")
        .await
        .unwrap();
    assert_eq!(small, 1.0);

    // July weekday: non-tourism metropolis gets the 0.8 summer damping
    let summer = ctx
        .advisor()
        .traffic_multiplier("İstanbul", "2025-07-15")
        .await
        .unwrap();
    assert_eq!(summer, 1.2);

    // Tourism city on a summer Saturday compounds both boosts
    let tourism = ctx
        .advisor()
        .traffic_multiplier("Antalya", "2025-07-19")
        .await
        .unwrap();
    assert_eq!(tourism, 2.91);
}

#[tokio::test]
async fn route_summary_aggregates_zones_and_conditions() {
    let ctx = context();
    let overrides = vec![
        labels::RAIN.to_string(),
        labels::SNOW.to_string(),
        labels::RAIN.to_string(),
    ];

    let advisory = ctx
        .advisor()
        .route_forecast(
            &cities(&["İstanbul", "Kars", "Trabzon"]),
            "2025-01-20",
            Some(&overrides),
        )
        .await
        .unwrap();

    assert_eq!(advisory.route_summary.total_cities, 3);
    assert_eq!(
        advisory.route_summary.weather_conditions,
        vec![labels::RAIN, labels::SNOW]
    );
    assert_eq!(
        advisory.route_summary.climate_zones,
        vec!["Black Sea", "Eastern Anatolia", "Marmara"]
    );
    let expected_duration = (1.10 + 1.15 + 1.10) / 3.0;
    assert!((advisory.route_summary.avg_duration_impact - expected_duration).abs() < 1e-9);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn malformed_date_is_rejected_before_any_model_runs() {
    let ctx = context();

    let result = ctx
        .advisor()
        .route_forecast(&cities(&["İstanbul"]), "15/07/2025", None)
        .await;

    assert!(matches!(result, Err(AppError::MalformedDate(_))));

    let result = ctx.advisor().traffic_multiplier("İstanbul", "not-a-date").await;
    assert!(matches!(result, Err(AppError::MalformedDate(_))));
}

#[tokio::test]
async fn empty_city_list_is_rejected() {
    let ctx = context();

    let result = ctx.advisor().route_forecast(&[], "2025-07-15", None).await;
    assert!(result.is_err());
}

// ============================================================================
// Property: traffic grows with population, all else equal
// ============================================================================

mod traffic_monotonicity {
    use chrono::Weekday;
    use proptest::prelude::*;
    use route_weather_advisor::services::{ImpactInput, ImpactResolver};
    use shared::labels;

    fn input(population: u64, weekday: Weekday, month: u32, tourism: bool) -> ImpactInput<'static> {
        ImpactInput {
            weather_label: labels::CLEAR,
            population,
            is_tourism_city: tourism,
            weekday,
            month,
            is_holiday: false,
        }
    }

    fn weekday_strategy() -> impl Strategy<Value = Weekday> {
        prop::sample::select(vec![
            Weekday::Mon,
            Weekday::Wed,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ])
    }

    proptest! {
        #[test]
        fn larger_population_never_lowers_traffic(
            smaller in 0u64..30_000_000,
            larger in 0u64..30_000_000,
            weekday in weekday_strategy(),
            month in 1u32..=12,
            tourism in any::<bool>(),
        ) {
            prop_assume!(smaller <= larger);
            let resolver = ImpactResolver::new();
            let low = resolver.traffic_multiplier(&input(smaller, weekday, month, tourism));
            let high = resolver.traffic_multiplier(&input(larger, weekday, month, tourism));
            prop_assert!(high >= low, "pop {smaller} -> {low}, pop {larger} -> {high}");
        }
    }
}

// ============================================================================
// Storage-failure degradation
// ============================================================================

struct FailingBackend;

#[async_trait]
impl StorageBackend for FailingBackend {
    async fn upsert_observation(&self, _input: &ObservationInput) -> AppResult<Observation> {
        Err(AppError::Storage("connection reset".into()))
    }

    async fn observations_for_city(&self, _city: &str) -> AppResult<Vec<Observation>> {
        Err(AppError::Storage("connection reset".into()))
    }

    async fn observations_for_day(
        &self,
        _city: &str,
        _month: u32,
        _day: u32,
        _limit: i64,
    ) -> AppResult<Vec<Observation>> {
        Err(AppError::Storage("connection reset".into()))
    }

    async fn replace_daily_probabilities(
        &self,
        _city: &str,
        _rows: &[DailyProbability],
    ) -> AppResult<()> {
        Err(AppError::Storage("connection reset".into()))
    }

    async fn daily_probabilities(
        &self,
        _city: &str,
        _month: u32,
        _day: u32,
    ) -> AppResult<Vec<DailyProbability>> {
        Err(AppError::Storage("connection reset".into()))
    }
}

#[tokio::test]
async fn read_failures_degrade_to_no_data_instead_of_erroring() {
    let mut config = Config::default();
    config.estimator.enabled = false;
    let ctx = AdvisorContext::with_backend(config, Box::new(FailingBackend)).unwrap();

    let forecast = ctx.advisor().forecast("İstanbul", 6, 15).await.unwrap();
    assert_eq!(forecast.weather_label, labels::NO_DATA);
    assert_eq!(forecast.sample_count, Some(0));
}

#[tokio::test]
async fn write_failures_surface_to_the_caller() {
    let mut config = Config::default();
    config.estimator.enabled = false;
    let ctx = AdvisorContext::with_backend(config, Box::new(FailingBackend)).unwrap();

    let input = ObservationInput {
        city: "İstanbul".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        weather_label: labels::RAIN.to_string(),
        temperature_c: 18.0,
        humidity_pct: None,
        wind_speed: None,
    };

    let result = ctx.advisor().record_and_aggregate(input).await;
    assert!(matches!(result, Err(AppError::Storage(_))));
}
