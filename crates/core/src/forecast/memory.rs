//! In-memory forecast store.
//!
//! Used when no database is configured and in tests. Each company's inputs
//! and forecast rows live behind one `RwLock`, so a replace is atomic with
//! respect to readers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use pipecast_shared::types::CompanyId;
use tokio::sync::RwLock;

use super::error::ForecastError;
use super::store::ForecastStore;
use super::types::{ForecastInputs, ForecastRow};

#[derive(Debug, Default)]
struct CompanyData {
    inputs: ForecastInputs,
    forecasts: Vec<ForecastRow>,
}

/// [`ForecastStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryForecastStore {
    data: RwLock<HashMap<CompanyId, CompanyData>>,
    unavailable: AtomicBool,
}

impl InMemoryForecastStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inputs for a company, keeping any existing forecast rows.
    pub async fn put_inputs(&self, company_id: CompanyId, inputs: ForecastInputs) {
        let mut data = self.data.write().await;
        data.entry(company_id).or_default().inputs = inputs;
    }

    /// Make every call fail with a storage error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ForecastError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ForecastError::storage("in-memory store is unavailable"));
        }
        Ok(())
    }
}

impl ForecastStore for InMemoryForecastStore {
    async fn load_inputs(&self, company_id: CompanyId) -> Result<ForecastInputs, ForecastError> {
        self.check_available()?;
        let data = self.data.read().await;
        Ok(data
            .get(&company_id)
            .map(|c| c.inputs.clone())
            .unwrap_or_default())
    }

    async fn replace_forecasts(
        &self,
        company_id: CompanyId,
        rows: Vec<ForecastRow>,
    ) -> Result<u64, ForecastError> {
        self.check_available()?;
        let written = rows.len() as u64;
        let mut data = self.data.write().await;
        data.entry(company_id).or_default().forecasts = rows;
        Ok(written)
    }

    async fn list_forecasts(&self, company_id: CompanyId) -> Result<Vec<ForecastRow>, ForecastError> {
        self.check_available()?;
        let data = self.data.read().await;
        Ok(data
            .get(&company_id)
            .map(|c| c.forecasts.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::period::Period;
    use pipecast_shared::types::{LeadTypeId, RegionId};

    fn row(company_id: CompanyId, quarter: u8) -> ForecastRow {
        ForecastRow {
            company_id,
            region_id: RegionId::new(),
            lead_type_id: LeadTypeId::new(),
            period: Period::new(2026, quarter).unwrap(),
            predicted_leads: 10,
            predicted_opportunities: 100,
            predicted_revenue_new: 700,
            predicted_revenue_upsell: 300,
        }
    }

    #[tokio::test]
    async fn test_replace_leaves_only_latest_rows() {
        let store = InMemoryForecastStore::new();
        let company_id = CompanyId::new();

        let first = vec![row(company_id, 1), row(company_id, 2), row(company_id, 3)];
        assert_eq!(store.replace_forecasts(company_id, first).await.unwrap(), 3);

        let second = vec![row(company_id, 4)];
        assert_eq!(
            store.replace_forecasts(company_id, second.clone()).await.unwrap(),
            1
        );

        assert_eq!(store.list_forecasts(company_id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_companies_are_isolated() {
        let store = InMemoryForecastStore::new();
        let a = CompanyId::new();
        let b = CompanyId::new();

        store.replace_forecasts(a, vec![row(a, 1)]).await.unwrap();
        store.replace_forecasts(b, vec![]).await.unwrap();

        assert_eq!(store.list_forecasts(a).await.unwrap().len(), 1);
        assert!(store.list_forecasts(b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_inputs_keeps_forecasts() {
        let store = InMemoryForecastStore::new();
        let company_id = CompanyId::new();
        store
            .replace_forecasts(company_id, vec![row(company_id, 1)])
            .await
            .unwrap();
        store
            .put_inputs(company_id, ForecastInputs::default())
            .await;

        assert_eq!(store.list_forecasts(company_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_company_loads_empty_inputs() {
        let store = InMemoryForecastStore::new();
        let inputs = store.load_inputs(CompanyId::new()).await.unwrap();
        assert!(inputs.regions.is_empty());
        assert!(inputs.history.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_and_keeps_rows() {
        let store = InMemoryForecastStore::new();
        let company_id = CompanyId::new();
        store
            .replace_forecasts(company_id, vec![row(company_id, 1)])
            .await
            .unwrap();

        store.set_unavailable(true);
        let err = store.replace_forecasts(company_id, vec![]).await.unwrap_err();
        assert!(matches!(err, ForecastError::Storage(_)));

        store.set_unavailable(false);
        assert_eq!(store.list_forecasts(company_id).await.unwrap().len(), 1);
    }
}
