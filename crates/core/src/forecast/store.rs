//! Persistence seam for forecast inputs and results.

use pipecast_shared::types::CompanyId;

use super::error::ForecastError;
use super::types::{ForecastInputs, ForecastRow};

/// Repository trait for forecast persistence.
///
/// This trait is implemented by the db crate for Postgres and by
/// [`InMemoryForecastStore`](super::memory::InMemoryForecastStore) for tests
/// and local runs.
pub trait ForecastStore: Send + Sync {
    /// Load regions, lead types, history and stored assumptions for a company.
    fn load_inputs(
        &self,
        company_id: CompanyId,
    ) -> impl std::future::Future<Output = Result<ForecastInputs, ForecastError>> + Send;

    /// Atomically delete every forecast row for the company and insert `rows`.
    ///
    /// Returns the number of rows inserted. On failure the previous rows must
    /// still be in place.
    fn replace_forecasts(
        &self,
        company_id: CompanyId,
        rows: Vec<ForecastRow>,
    ) -> impl std::future::Future<Output = Result<u64, ForecastError>> + Send;

    /// List the company's persisted forecast rows.
    fn list_forecasts(
        &self,
        company_id: CompanyId,
    ) -> impl std::future::Future<Output = Result<Vec<ForecastRow>, ForecastError>> + Send;
}
