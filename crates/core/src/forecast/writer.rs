//! Turns cascade results into persisted forecast rows.

use std::collections::HashMap;

use pipecast_shared::types::{CompanyId, LeadTypeId, RegionId};
use tracing::debug;

use super::error::ForecastError;
use super::numeric::{BPS_SCALE, OPPORTUNITY_PRECISION, scale_by_bp};
use super::store::ForecastStore;
use super::types::{CascadeResult, ForecastInputs, ForecastRow};

/// Default new-business share of revenue (70%).
pub const DEFAULT_REVENUE_NEW_SHARE_BP: i64 = 7_000;

/// Fixed-ratio split of revenue into new and upsell shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueSplit {
    new_share_bp: i64,
}

impl RevenueSplit {
    /// Create a split with `new_share_bp` going to new business, clamped to
    /// 0..=10000.
    #[must_use]
    pub fn new(new_share_bp: i64) -> Self {
        Self {
            new_share_bp: new_share_bp.clamp(0, BPS_SCALE),
        }
    }

    /// `(new, upsell)`. Upsell takes the remainder so the two always add up
    /// to `revenue`.
    #[must_use]
    pub fn split(&self, revenue: i64) -> (i64, i64) {
        let new = scale_by_bp(revenue, self.new_share_bp);
        (new, revenue - new)
    }
}

impl Default for RevenueSplit {
    fn default() -> Self {
        Self::new(DEFAULT_REVENUE_NEW_SHARE_BP)
    }
}

/// Resolves and persists cascade output.
pub struct ForecastWriter;

impl ForecastWriter {
    /// Builds rows for every result, resolving names against the company's
    /// regions and lead types.
    ///
    /// # Errors
    ///
    /// Fails on the first name that does not resolve. No rows are returned in
    /// that case, so nothing partial reaches the store.
    pub fn build_rows(
        company_id: CompanyId,
        inputs: &ForecastInputs,
        results: &[CascadeResult],
        split: RevenueSplit,
    ) -> Result<Vec<ForecastRow>, ForecastError> {
        let regions: HashMap<&str, RegionId> = inputs
            .regions
            .iter()
            .map(|r| (r.name.as_str(), r.id))
            .collect();
        let lead_types: HashMap<&str, LeadTypeId> = inputs
            .lead_types
            .iter()
            .map(|l| (l.name.as_str(), l.id))
            .collect();

        results
            .iter()
            .map(|result| {
                let region_id = *regions
                    .get(result.region.as_str())
                    .ok_or_else(|| ForecastError::UnknownRegion(result.region.clone()))?;
                let lead_type_id = *lead_types
                    .get(result.lead_type.as_str())
                    .ok_or_else(|| ForecastError::UnknownLeadType(result.lead_type.clone()))?;
                let (revenue_new, revenue_upsell) = split.split(result.revenue);

                Ok(ForecastRow {
                    company_id,
                    region_id,
                    lead_type_id,
                    period: result.period,
                    predicted_leads: result.sql_volume,
                    predicted_opportunities: result
                        .opportunities
                        .saturating_mul(OPPORTUNITY_PRECISION),
                    predicted_revenue_new: revenue_new,
                    predicted_revenue_upsell: revenue_upsell,
                })
            })
            .collect()
    }

    /// Replaces the company's forecast with `results`.
    ///
    /// Validation runs before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if a name does not resolve or the store fails.
    pub async fn save<S: ForecastStore>(
        store: &S,
        company_id: CompanyId,
        inputs: &ForecastInputs,
        results: &[CascadeResult],
        split: RevenueSplit,
    ) -> Result<u64, ForecastError> {
        let rows = Self::build_rows(company_id, inputs, results, split)?;
        debug!(%company_id, rows = rows.len(), "Replacing forecast rows");
        store.replace_forecasts(company_id, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::period::Period;
    use crate::forecast::types::{LeadType, Region};
    use rstest::rstest;

    fn inputs(company_id: CompanyId) -> ForecastInputs {
        ForecastInputs {
            regions: vec![Region {
                id: RegionId::new(),
                company_id,
                name: "NA".into(),
                is_enabled: true,
            }],
            lead_types: vec![LeadType {
                id: LeadTypeId::new(),
                company_id,
                name: "Partner".into(),
                is_enabled: true,
            }],
            ..ForecastInputs::default()
        }
    }

    fn result(region: &str, lead_type: &str, revenue: i64) -> CascadeResult {
        CascadeResult {
            region: region.into(),
            lead_type: lead_type.into(),
            period: Period::new(2026, 1).unwrap(),
            sql_volume: 120,
            opportunities: 7,
            revenue,
        }
    }

    #[rstest]
    #[case(1_000_000, 7_000, 700_000, 300_000)]
    #[case(5_562_500, 7_000, 3_893_750, 1_668_750)]
    #[case(1, 7_000, 1, 0)]
    #[case(999, 10_000, 999, 0)]
    #[case(999, 0, 0, 999)]
    fn test_revenue_split(
        #[case] revenue: i64,
        #[case] share: i64,
        #[case] new: i64,
        #[case] upsell: i64,
    ) {
        assert_eq!(RevenueSplit::new(share).split(revenue), (new, upsell));
    }

    #[test]
    fn test_split_share_is_clamped() {
        assert_eq!(RevenueSplit::new(12_000), RevenueSplit::new(BPS_SCALE));
        assert_eq!(RevenueSplit::new(-1), RevenueSplit::new(0));
    }

    #[test]
    fn test_build_rows_scales_opportunities() {
        let company_id = CompanyId::new();
        let inputs = inputs(company_id);
        let rows = ForecastWriter::build_rows(
            company_id,
            &inputs,
            &[result("NA", "Partner", 1_000_000)],
            RevenueSplit::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region_id, inputs.regions[0].id);
        assert_eq!(rows[0].lead_type_id, inputs.lead_types[0].id);
        assert_eq!(rows[0].predicted_leads, 120);
        assert_eq!(rows[0].predicted_opportunities, 700);
        assert_eq!(rows[0].predicted_revenue_new, 700_000);
        assert_eq!(rows[0].predicted_revenue_upsell, 300_000);
    }

    #[test]
    fn test_unknown_region_fails_whole_batch() {
        let company_id = CompanyId::new();
        let err = ForecastWriter::build_rows(
            company_id,
            &inputs(company_id),
            &[result("NA", "Partner", 1), result("APAC", "Partner", 1)],
            RevenueSplit::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::UnknownRegion(name) if name == "APAC"));
    }

    #[test]
    fn test_unknown_lead_type_fails() {
        let company_id = CompanyId::new();
        let err = ForecastWriter::build_rows(
            company_id,
            &inputs(company_id),
            &[result("NA", "Events", 1)],
            RevenueSplit::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::UnknownLeadType(_)));
    }
}
