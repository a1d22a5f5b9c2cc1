//! Forecast service: load, compute, persist.

use std::sync::Arc;

use pipecast_shared::ForecastSettings;
use pipecast_shared::types::CompanyId;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::cascade::{CascadeCalculator, QUARTERS_PER_YEAR};
use super::error::ForecastError;
use super::lock::CompanyLocks;
use super::period::Period;
use super::scenario::ScenarioAdjustment;
use super::store::ForecastStore;
use super::types::ForecastRow;
use super::what_if::{WhatIfEngine, WhatIfOutcome};
use super::writer::{ForecastWriter, RevenueSplit};

/// Supported forecast horizon in years.
pub const HORIZON_YEARS: std::ops::RangeInclusive<u32> = 1..=10;

/// Result of a recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculationSummary {
    /// Company recalculated.
    pub company_id: CompanyId,
    /// First forecast quarter.
    pub start: Period,
    /// Horizon in years.
    pub horizon_years: u32,
    /// Number of quarters covered.
    pub quarters: u32,
    /// Rows written.
    pub rows_written: u64,
    /// Sum of predicted revenue across all rows, cents.
    pub total_revenue: i64,
}

/// Orchestrates forecast recalculation and what-if runs over a store.
pub struct ForecastService<S: ForecastStore> {
    store: Arc<S>,
    locks: CompanyLocks,
    settings: ForecastSettings,
}

impl<S: ForecastStore> Clone for ForecastService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            locks: self.locks.clone(),
            settings: self.settings,
        }
    }
}

impl<S: ForecastStore> ForecastService<S> {
    /// Create a new forecast service.
    #[must_use]
    pub fn new(store: Arc<S>, settings: ForecastSettings) -> Self {
        Self {
            store,
            locks: CompanyLocks::new(),
            settings,
        }
    }

    /// The configured settings.
    #[must_use]
    pub const fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recompute and replace the company's forecast.
    ///
    /// Runs under the company's lock, so overlapping calls for the same
    /// company are serialized. `horizon_years` falls back to the configured
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The horizon is outside 1-10 years
    /// - A cascade result names an unknown region or lead type
    /// - The store fails
    pub async fn recalculate(
        &self,
        company_id: CompanyId,
        start: Period,
        horizon_years: Option<u32>,
    ) -> Result<RecalculationSummary, ForecastError> {
        let horizon_years = horizon_years.unwrap_or(self.settings.horizon_years);
        if !HORIZON_YEARS.contains(&horizon_years) {
            return Err(ForecastError::InvalidHorizon(horizon_years));
        }

        let _guard = self.locks.acquire(company_id).await;
        info!(%company_id, %start, horizon_years, "Recalculating forecast");

        let inputs = self.store.load_inputs(company_id).await?;
        let results = CascadeCalculator::run(&inputs, start, horizon_years);
        let total_revenue = results
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.revenue));

        let rows_written = ForecastWriter::save(
            self.store.as_ref(),
            company_id,
            &inputs,
            &results,
            RevenueSplit::new(self.settings.revenue_new_share_bp),
        )
        .await?;

        info!(%company_id, rows_written, total_revenue, "Forecast recalculated");

        Ok(RecalculationSummary {
            company_id,
            start,
            horizon_years,
            quarters: horizon_years * QUARTERS_PER_YEAR,
            rows_written,
            total_revenue,
        })
    }

    /// The company's persisted forecast, ordered by region, lead type and
    /// quarter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn forecasts(&self, company_id: CompanyId) -> Result<Vec<ForecastRow>, ForecastError> {
        let mut rows = self.store.list_forecasts(company_id).await?;
        rows.sort_by_key(|r| (r.region_id, r.lead_type_id, r.period));
        Ok(rows)
    }

    /// Run a what-if comparison. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the company has no enabled history or the store
    /// fails.
    pub async fn what_if(
        &self,
        company_id: CompanyId,
        adjustment: &ScenarioAdjustment,
    ) -> Result<WhatIfOutcome, ForecastError> {
        let inputs = self.store.load_inputs(company_id).await?;
        let outcome = WhatIfEngine::run(&inputs, adjustment, self.settings.what_if_quarters)?;
        info!(
            %company_id,
            quarters = outcome.adjusted.len(),
            revenue_change = outcome.impact.totals.revenue_change,
            "What-if calculated"
        );
        Ok(outcome)
    }
}
