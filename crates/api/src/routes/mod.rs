//! API route definitions.

use axum::Router;
use pipecast_core::forecast::ForecastStore;

use crate::AppState;

pub mod forecasts;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes<S: ForecastStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .merge(health::routes())
        .merge(forecasts::routes())
}
