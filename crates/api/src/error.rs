//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pipecast_core::forecast::ForecastError;
use pipecast_shared::AppError;
use serde_json::json;
use tracing::error;

/// Converts an [`AppError`] into a JSON error response.
///
/// Server errors are logged and returned with a generic message.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_server_error() {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code().to_lowercase(),
            "message": message
        })),
    )
        .into_response()
}

/// Converts a [`ForecastError`] into a JSON error response.
pub fn forecast_error_response(err: ForecastError) -> Response {
    error_response(&AppError::from(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ForecastError::InvalidQuarter(5), StatusCode::BAD_REQUEST)]
    #[case(ForecastError::InvalidHorizon(0), StatusCode::BAD_REQUEST)]
    #[case(ForecastError::UnknownRegion("X".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(ForecastError::NoHistoricalData, StatusCode::NOT_FOUND)]
    #[case(ForecastError::overflow("acv_new delta"), StatusCode::BAD_REQUEST)]
    #[case(ForecastError::storage("down"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_forecast_error_status(#[case] err: ForecastError, #[case] status: StatusCode) {
        assert_eq!(forecast_error_response(err).status(), status);
    }
}
