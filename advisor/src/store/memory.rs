//! In-memory storage adapter
//!
//! Used when no database URL is configured, and as the test double for the
//! storage contract. The write lock serializes recomputations the way the
//! Postgres transaction does.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::StorageBackend;
use shared::{DailyProbability, Observation, ObservationInput};

#[derive(Default)]
struct MemoryState {
    observations: BTreeMap<(String, NaiveDate), Observation>,
    probabilities: BTreeMap<String, Vec<DailyProbability>>,
}

/// Adapter holding everything in process memory
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn upsert_observation(&self, input: &ObservationInput) -> AppResult<Observation> {
        let mut state = self.state.write().await;
        let key = (input.city.clone(), input.date);
        // Overwrite keeps the original row id so reruns stay idempotent
        let id = state
            .observations
            .get(&key)
            .map(|existing| existing.id)
            .unwrap_or_else(Uuid::new_v4);

        let observation = Observation {
            id,
            city: input.city.clone(),
            date: input.date,
            weather_label: input.weather_label.clone(),
            temperature_c: input.temperature_c,
            humidity_pct: input.humidity_pct,
            wind_speed: input.wind_speed,
            created_at: Utc::now(),
        };
        state.observations.insert(key, observation.clone());
        Ok(observation)
    }

    async fn observations_for_city(&self, city: &str) -> AppResult<Vec<Observation>> {
        let state = self.state.read().await;
        Ok(state
            .observations
            .values()
            .filter(|o| o.city == city)
            .cloned()
            .collect())
    }

    async fn observations_for_day(
        &self,
        city: &str,
        month: u32,
        day: u32,
        limit: i64,
    ) -> AppResult<Vec<Observation>> {
        let state = self.state.read().await;
        let mut matches: Vec<Observation> = state
            .observations
            .values()
            .filter(|o| o.city == city && o.date.month() == month && o.date.day() == day)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches.truncate(limit.max(0) as usize);
        Ok(matches)
    }

    async fn replace_daily_probabilities(
        &self,
        city: &str,
        rows: &[DailyProbability],
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.probabilities.insert(city.to_string(), rows.to_vec());
        Ok(())
    }

    async fn daily_probabilities(
        &self,
        city: &str,
        month: u32,
        day: u32,
    ) -> AppResult<Vec<DailyProbability>> {
        let state = self.state.read().await;
        let mut rows: Vec<DailyProbability> = state
            .probabilities
            .get(city)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.month == month && r.day == day)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then_with(|| a.weather_label.cmp(&b.weather_label))
        });
        Ok(rows)
    }
}
