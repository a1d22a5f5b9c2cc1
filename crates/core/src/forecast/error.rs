//! Forecast error types.

use pipecast_shared::AppError;
use thiserror::Error;

/// Forecast-related errors.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Quarter outside 1-4.
    #[error("Quarter must be between 1 and 4, got {0}")]
    InvalidQuarter(u8),

    /// Horizon outside the supported range.
    #[error("Forecast horizon must be between 1 and 10 years, got {0}")]
    InvalidHorizon(u32),

    /// A result names a region the company does not have.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// A result names a lead type the company does not have.
    #[error("Unknown lead type: {0}")]
    UnknownLeadType(String),

    /// No historical volume to anchor a what-if projection.
    #[error("No historical volume found for this company")]
    NoHistoricalData,

    /// A calculation left the representable range.
    #[error("Calculation overflow: {0}")]
    Overflow(String),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ForecastError {
    /// Create an overflow error.
    #[must_use]
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        let msg = err.to_string();
        match err {
            ForecastError::InvalidQuarter(_)
            | ForecastError::InvalidHorizon(_)
            | ForecastError::Overflow(_) => Self::Validation(msg),
            ForecastError::UnknownRegion(_) | ForecastError::UnknownLeadType(_) => {
                Self::BusinessRule(msg)
            }
            ForecastError::NoHistoricalData => Self::NotFound(msg),
            ForecastError::Storage(_) => Self::Database(msg),
        }
    }
}
