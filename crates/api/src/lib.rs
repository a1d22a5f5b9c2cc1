//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for forecast recalculation, listing and what-if runs
//! - Error-to-response mapping
//! - Response types

pub mod error;
pub mod routes;

use axum::Router;
use pipecast_core::forecast::{ForecastService, ForecastStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct AppState<S: ForecastStore> {
    /// Forecast service over the configured store.
    pub forecasts: ForecastService<S>,
}

impl<S: ForecastStore> AppState<S> {
    /// Create state around a forecast service.
    #[must_use]
    pub const fn new(forecasts: ForecastService<S>) -> Self {
        Self { forecasts }
    }
}

impl<S: ForecastStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            forecasts: self.forecasts.clone(),
        }
    }
}

/// Creates the main application router.
pub fn create_router<S: ForecastStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
