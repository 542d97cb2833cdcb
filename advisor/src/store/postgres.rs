//! PostgreSQL storage adapter

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::StorageBackend;
use shared::{DailyProbability, Observation, ObservationInput};

/// Observation row as stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
struct ObservationRow {
    id: Uuid,
    city: String,
    date: NaiveDate,
    weather_label: String,
    temperature_c: f64,
    humidity_pct: Option<i32>,
    wind_speed: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        Observation {
            id: row.id,
            city: row.city,
            date: row.date,
            weather_label: row.weather_label,
            temperature_c: row.temperature_c,
            humidity_pct: row.humidity_pct,
            wind_speed: row.wind_speed,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DailyProbabilityRow {
    city: String,
    month: i32,
    day: i32,
    weather_label: String,
    probability: f64,
    sample_count: i64,
}

impl From<DailyProbabilityRow> for DailyProbability {
    fn from(row: DailyProbabilityRow) -> Self {
        DailyProbability {
            city: row.city,
            month: row.month as u32,
            day: row.day as u32,
            weather_label: row.weather_label,
            probability: row.probability,
            sample_count: row.sample_count,
        }
    }
}

/// Adapter backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PostgresBackend {
    db: PgPool,
}

impl PostgresBackend {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    async fn upsert_observation(&self, input: &ObservationInput) -> AppResult<Observation> {
        let row = sqlx::query_as::<_, ObservationRow>(
            r#"
            INSERT INTO observations (city, date, weather_label, temperature_c, humidity_pct, wind_speed)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (city, date) DO UPDATE
                SET weather_label = EXCLUDED.weather_label,
                    temperature_c = EXCLUDED.temperature_c,
                    humidity_pct = EXCLUDED.humidity_pct,
                    wind_speed = EXCLUDED.wind_speed
            RETURNING id, city, date, weather_label, temperature_c, humidity_pct, wind_speed, created_at
            "#,
        )
        .bind(&input.city)
        .bind(input.date)
        .bind(&input.weather_label)
        .bind(input.temperature_c)
        .bind(input.humidity_pct)
        .bind(input.wind_speed)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn observations_for_city(&self, city: &str) -> AppResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r#"
            SELECT id, city, date, weather_label, temperature_c, humidity_pct, wind_speed, created_at
            FROM observations
            WHERE city = $1
            ORDER BY date
            "#,
        )
        .bind(city)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn observations_for_day(
        &self,
        city: &str,
        month: u32,
        day: u32,
        limit: i64,
    ) -> AppResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r#"
            SELECT id, city, date, weather_label, temperature_c, humidity_pct, wind_speed, created_at
            FROM observations
            WHERE city = $1
              AND date_part('month', date)::int = $2
              AND date_part('day', date)::int = $3
            ORDER BY date DESC
            LIMIT $4
            "#,
        )
        .bind(city)
        .bind(month as i32)
        .bind(day as i32)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn replace_daily_probabilities(
        &self,
        city: &str,
        rows: &[DailyProbability],
    ) -> AppResult<()> {
        // One transaction serializes concurrent recomputations per city and
        // gives the replace its all-or-nothing semantics
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM daily_probabilities WHERE city = $1")
            .bind(city)
            .execute(&mut *tx)
            .await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO daily_probabilities (city, month, day, weather_label, probability, sample_count)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&row.city)
            .bind(row.month as i32)
            .bind(row.day as i32)
            .bind(&row.weather_label)
            .bind(row.probability)
            .bind(row.sample_count)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn daily_probabilities(
        &self,
        city: &str,
        month: u32,
        day: u32,
    ) -> AppResult<Vec<DailyProbability>> {
        let rows = sqlx::query_as::<_, DailyProbabilityRow>(
            r#"
            SELECT city, month, day, weather_label, probability, sample_count
            FROM daily_probabilities
            WHERE city = $1 AND month = $2 AND day = $3
            ORDER BY probability DESC, weather_label
            "#,
        )
        .bind(city)
        .bind(month as i32)
        .bind(day as i32)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
