//! Observation store: durable observations and derived daily probabilities
//!
//! A single `StorageBackend` trait (upsert-by-key, range scan, full replace
//! of aggregates) with one concrete adapter selected at startup; the rest of
//! the core never branches on which backend is active. The `ObservationStore`
//! wrapper owns the probability-computation contract and the degraded-read
//! behavior: a backend failure on the read path is caught here and collapses
//! to the documented zero-sample result.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::error::AppResult;
use shared::{DailyDistribution, DailyProbability, Observation, ObservationInput};

pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;

/// Raw storage capability behind the observation store
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Idempotent upsert keyed by (city, date); overwrite on conflict
    async fn upsert_observation(&self, input: &ObservationInput) -> AppResult<Observation>;

    /// All observations recorded for a city, ordered by date
    async fn observations_for_city(&self, city: &str) -> AppResult<Vec<Observation>>;

    /// Observations matching (city, month, day) across years, newest first
    async fn observations_for_day(
        &self,
        city: &str,
        month: u32,
        day: u32,
        limit: i64,
    ) -> AppResult<Vec<Observation>>;

    /// Replace every daily-probability row for a city in one atomic step
    async fn replace_daily_probabilities(
        &self,
        city: &str,
        rows: &[DailyProbability],
    ) -> AppResult<()>;

    /// Probability rows for one (city, month, day) key
    async fn daily_probabilities(
        &self,
        city: &str,
        month: u32,
        day: u32,
    ) -> AppResult<Vec<DailyProbability>>;
}

/// Select the concrete adapter from configuration
///
/// A configured database URL selects Postgres; otherwise the process runs on
/// the in-memory adapter (tests, diagnostics, ephemeral deployments).
pub async fn resolve_backend(config: &DatabaseConfig) -> AppResult<Box<dyn StorageBackend>> {
    match &config.url {
        Some(url) => {
            info!("Connecting observation store to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
                crate::error::AppError::Storage(format!("migration failed: {e}"))
            })?;
            Ok(Box::new(PostgresBackend::new(pool)))
        }
        None => {
            info!("No database URL configured; using in-memory observation store");
            Ok(Box::new(MemoryBackend::new()))
        }
    }
}

/// The observation store exposed to the rest of the core
pub struct ObservationStore {
    backend: Box<dyn StorageBackend>,
    /// Serializes recomputations: the snapshot read and the aggregate
    /// replace must not interleave across concurrent writers, or a replace
    /// computed from a stale snapshot silently drops newer observations
    recompute_lock: tokio::sync::Mutex<()>,
}

impl ObservationStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            recompute_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Record one observation; overwrites any existing (city, date) row
    pub async fn record_observation(&self, input: &ObservationInput) -> AppResult<Observation> {
        self.backend.upsert_observation(input).await
    }

    /// Recompute and persist the full probability distribution for a city
    ///
    /// For every (month, day) with at least one observation, label counts
    /// across all observed years are divided by the day's total. Rows are
    /// emitted in (month, day, label) order and fully replace the previous
    /// set, so a rerun with no new observations is byte-identical.
    pub async fn recompute_probabilities(&self, city: &str) -> AppResult<usize> {
        let _guard = self.recompute_lock.lock().await;
        let observations = self.backend.observations_for_city(city).await?;

        // (month, day) -> label -> count
        let mut day_counts: BTreeMap<(u32, u32), BTreeMap<String, i64>> = BTreeMap::new();
        for obs in &observations {
            use chrono::Datelike;
            let key = (obs.date.month(), obs.date.day());
            *day_counts
                .entry(key)
                .or_default()
                .entry(obs.weather_label.clone())
                .or_insert(0) += 1;
        }

        let mut rows = Vec::new();
        for ((month, day), labels) in &day_counts {
            let total: i64 = labels.values().sum();
            for (label, count) in labels {
                rows.push(DailyProbability {
                    city: city.to_string(),
                    month: *month,
                    day: *day,
                    weather_label: label.clone(),
                    probability: *count as f64 / total as f64,
                    sample_count: *count,
                });
            }
        }

        self.backend.replace_daily_probabilities(city, &rows).await?;
        info!(city, rows = rows.len(), "Recomputed daily probabilities");
        Ok(rows.len())
    }

    /// Label distribution for a calendar day
    ///
    /// Returns the explicit zero-sample result both when no observation
    /// exists for the key and when the backend fails: callers must treat
    /// "store failure" and "no data collected yet" identically.
    pub async fn get_daily_probability(&self, city: &str, month: u32, day: u32) -> DailyDistribution {
        let rows = match self.backend.daily_probabilities(city, month, day).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(city, month, day, error = %e, "Storage backend failed; degrading to zero-sample");
                return DailyDistribution::zero_sample(city, month, day);
            }
        };

        if rows.is_empty() {
            return DailyDistribution::zero_sample(city, month, day);
        }

        let mut probabilities = BTreeMap::new();
        let mut sample_count = 0i64;
        for row in &rows {
            probabilities.insert(row.weather_label.clone(), row.probability);
            sample_count += row.sample_count;
        }
        // Ties break toward the lexicographically smaller label, which keeps
        // the result stable across recomputations
        let (most_likely, confidence) = probabilities
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(label, p)| (Some(label.clone()), *p))
            .unwrap_or((None, 0.0));

        DailyDistribution {
            city: city.to_string(),
            month,
            day,
            probabilities,
            most_likely,
            confidence,
            sample_count,
        }
    }

    /// Most recent observations for (month, day) across years, newest first
    ///
    /// Display/explanation data; degrades to empty on backend failure.
    pub async fn get_recent_examples(
        &self,
        city: &str,
        month: u32,
        day: u32,
        limit: i64,
    ) -> Vec<Observation> {
        match self
            .backend
            .observations_for_day(city, month, day, limit)
            .await
        {
            Ok(examples) => examples,
            Err(e) => {
                warn!(city, month, day, error = %e, "Could not load historical examples");
                Vec::new()
            }
        }
    }
}
