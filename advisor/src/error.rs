//! Error handling for the Route Weather Advisory core
//!
//! The taxonomy is deliberately small: only malformed caller input surfaces
//! as an error before any model runs. Unknown cities, missing historical
//! data, an unavailable storage backend, and estimator inference failures
//! all have documented degraded outputs and never reach the caller as
//! errors. Nothing in the core is fatal to the process.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Caller input errors
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Malformed date: {0}")]
    MalformedDate(String),

    // Degradable internal errors; callers inside the core catch these at
    // component boundaries and substitute the documented defaults
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("No historical data for {city} on {month:02}-{day:02}")]
    NoHistoricalData { city: String, month: u32, day: u32 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Model inference error: {0}")]
    ModelInference(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, mirrored by the (external) web layer
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::MalformedDate(_) => "MALFORMED_DATE",
            AppError::UnknownCity(_) => "UNKNOWN_CITY",
            AppError::NoHistoricalData { .. } => "NO_HISTORICAL_DATA",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::ModelInference(_) => "MODEL_INFERENCE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "input".to_string());
        AppError::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

/// Result type alias for the advisory core
pub type AppResult<T> = Result<T, AppError>;
