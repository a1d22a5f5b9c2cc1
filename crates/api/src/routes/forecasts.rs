//! Forecast routes.
//!
//! Recalculation replaces the company's stored forecast. What-if runs are
//! computed on request and never stored.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Utc};
use pipecast_core::forecast::{
    ForecastError, ForecastRow, ForecastStore, Period, ScenarioAdjustment, ScenarioSummary,
    WhatIfOutcome,
};
use pipecast_shared::AppError;
use pipecast_shared::types::{CompanyId, LeadTypeId, RegionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::{error_response, forecast_error_response};

/// Creates the forecast routes.
pub fn routes<S: ForecastStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/companies/{company_id}/forecasts/recalculate",
            post(recalculate::<S>),
        )
        .route("/companies/{company_id}/forecasts", get(list_forecasts::<S>))
        .route("/companies/{company_id}/what-if", post(what_if::<S>))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a recalculation. Missing fields fall back to the current
/// quarter and the configured horizon.
#[derive(Debug, Default, Deserialize)]
pub struct RecalculateRequest {
    /// First forecast year.
    #[serde(default)]
    pub year: Option<i32>,
    /// First forecast quarter (1-4).
    #[serde(default)]
    pub quarter: Option<u8>,
    /// Horizon in years (1-10).
    #[serde(default)]
    pub horizon_years: Option<u32>,
}

/// One persisted forecast row.
#[derive(Debug, Serialize)]
pub struct ForecastRowResponse {
    /// Region ID.
    pub region_id: RegionId,
    /// Lead type ID.
    pub lead_type_id: LeadTypeId,
    /// Forecast year.
    pub year: i32,
    /// Forecast quarter.
    pub quarter: u8,
    /// Period label, e.g. `2026-Q1`.
    pub period: String,
    /// Predicted lead count.
    pub predicted_leads: i64,
    /// Predicted opportunities as stored (scaled by 100).
    pub predicted_opportunities: i64,
    /// Predicted opportunities unscaled.
    pub opportunities: Decimal,
    /// New-business revenue, cents.
    pub predicted_revenue_new: i64,
    /// Upsell revenue, cents.
    pub predicted_revenue_upsell: i64,
}

impl From<ForecastRow> for ForecastRowResponse {
    fn from(row: ForecastRow) -> Self {
        Self {
            region_id: row.region_id,
            lead_type_id: row.lead_type_id,
            year: row.period.year(),
            quarter: row.period.quarter(),
            period: row.period.to_string(),
            predicted_leads: row.predicted_leads,
            predicted_opportunities: row.predicted_opportunities,
            opportunities: Decimal::new(row.predicted_opportunities, 2),
            predicted_revenue_new: row.predicted_revenue_new,
            predicted_revenue_upsell: row.predicted_revenue_upsell,
        }
    }
}

/// Response for the forecast listing.
#[derive(Debug, Serialize)]
pub struct ForecastListResponse {
    /// Company ID.
    pub company_id: CompanyId,
    /// Rows ordered by region, lead type and quarter.
    pub forecasts: Vec<ForecastRowResponse>,
    /// Sum of new and upsell revenue across all rows, cents.
    pub total_revenue: i64,
}

/// Request body for a what-if run.
#[derive(Debug, Default, Deserialize)]
pub struct WhatIfRequest {
    /// Adjustments to apply.
    #[serde(flatten)]
    pub adjustment: ScenarioAdjustment,
    /// When set, the response carries a summary under this name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response for a what-if run.
#[derive(Debug, Serialize)]
pub struct WhatIfResponse {
    /// Baseline, adjusted and impact.
    #[serde(flatten)]
    pub outcome: WhatIfOutcome,
    /// Summary for saving as a named scenario.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScenarioSummary>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// The quarter containing today (UTC).
fn current_period() -> Result<Period, ForecastError> {
    let today = Utc::now().date_naive();
    let quarter = u8::try_from(today.month0() / 3 + 1).unwrap_or(1);
    Period::new(today.year(), quarter)
}

/// Resolves the requested start quarter, filling gaps from `current`.
fn requested_start(request: &RecalculateRequest, current: Period) -> Result<Period, ForecastError> {
    Period::new(
        request.year.unwrap_or_else(|| current.year()),
        request.quarter.unwrap_or_else(|| current.quarter()),
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /companies/{company_id}/forecasts/recalculate
async fn recalculate<S: ForecastStore + 'static>(
    State(state): State<AppState<S>>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<RecalculateRequest>,
) -> Response {
    let company_id = CompanyId::from_uuid(company_id);

    let start = match current_period().and_then(|current| requested_start(&request, current)) {
        Ok(start) => start,
        Err(e) => return forecast_error_response(e),
    };

    match state
        .forecasts
        .recalculate(company_id, start, request.horizon_years)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => forecast_error_response(e),
    }
}

/// GET /companies/{company_id}/forecasts
async fn list_forecasts<S: ForecastStore + 'static>(
    State(state): State<AppState<S>>,
    Path(company_id): Path<Uuid>,
) -> Response {
    let company_id = CompanyId::from_uuid(company_id);

    match state.forecasts.forecasts(company_id).await {
        Ok(rows) => {
            let total_revenue = rows
                .iter()
                .map(|r| r.predicted_revenue_new.saturating_add(r.predicted_revenue_upsell))
                .fold(0i64, i64::saturating_add);
            let response = ForecastListResponse {
                company_id,
                forecasts: rows.into_iter().map(ForecastRowResponse::from).collect(),
                total_revenue,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => forecast_error_response(e),
    }
}

/// POST /companies/{company_id}/what-if
async fn what_if<S: ForecastStore + 'static>(
    State(state): State<AppState<S>>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<WhatIfRequest>,
) -> Response {
    let company_id = CompanyId::from_uuid(company_id);

    if request
        .adjustment
        .conversion_rate_multiplier
        .is_some_and(|m| m < 0)
    {
        return error_response(&AppError::Validation(
            "conversion_rate_multiplier must not be negative".to_string(),
        ));
    }

    match state.forecasts.what_if(company_id, &request.adjustment).await {
        Ok(outcome) => {
            let summary = request.name.map(|name| outcome.summary(name));
            (StatusCode::OK, Json(WhatIfResponse { outcome, summary })).into_response()
        }
        Err(e) => forecast_error_response(e),
    }
}
