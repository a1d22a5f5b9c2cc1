//! What-if projection over adjusted assumptions.
//!
//! This is a separate, simpler model than [`CascadeCalculator`]: it projects
//! forward from the latest historical quarter, looks back over every history
//! row, and values opportunities at the mean of the new and upsell win rates
//! and ACVs. Baseline and adjusted sides both run through this model, so
//! the comparison never mixes it with the persisted forecast.
//!
//! [`CascadeCalculator`]: super::cascade::CascadeCalculator

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::assumptions::{AssumptionIndex, Assumptions};
use super::error::ForecastError;
use super::impact::{Impact, ImpactComparator};
use super::numeric::{bp, checked_round_to_i64};
use super::period::Period;
use super::scenario::{ScenarioAdjustment, ScenarioApplier};
use super::types::ForecastInputs;

/// Aggregate projection for one quarter across all regions and lead types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterProjection {
    /// Quarter.
    pub period: Period,
    /// Projected opportunities, rounded.
    pub opportunities: i64,
    /// Projected revenue, cents.
    pub revenue: i64,
}

/// Projects quarterly totals from history.
pub struct WhatIfCalculator;

impl WhatIfCalculator {
    /// Projects `quarters` quarters after the latest enabled history quarter.
    ///
    /// Each history row contributes to a target quarter when the lag is 0, 1
    /// or 2 quarters, using its lead type's matching share.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no enabled history, or
    /// [`ForecastError::Overflow`] if a quarter's totals leave the `i64`
    /// range.
    pub fn project(
        inputs: &ForecastInputs,
        assumptions: &Assumptions,
        quarters: u32,
    ) -> Result<Vec<QuarterProjection>, ForecastError> {
        let latest = inputs
            .latest_period()
            .ok_or(ForecastError::NoHistoricalData)?;
        let index = AssumptionIndex::new(assumptions);
        let two = Decimal::TWO;

        let mut totals: BTreeMap<Period, (Decimal, Decimal)> = latest
            .next()
            .horizon(quarters)
            .map(|p| (p, (Decimal::ZERO, Decimal::ZERO)))
            .collect();

        for (target, (opportunities, revenue)) in &mut totals {
            let overflow = || ForecastError::overflow(format!("what-if projection for {target}"));

            for row in inputs.enabled_history() {
                let distribution = index.time_distribution(row.lead_type_id);
                let Some(share) = distribution.share_for_lag(target.quarters_since(row.period))
                else {
                    continue;
                };

                let rate = index.conversion_rate(row.region_id, row.lead_type_id);
                let economics = index.deal_economics(row.region_id);
                let win_rate = (bp(rate.win_rate_new) + bp(rate.win_rate_upsell)) / two;
                let acv =
                    (Decimal::from(economics.acv_new) + Decimal::from(economics.acv_upsell)) / two;

                let contributed = Decimal::from(row.volume)
                    .checked_mul(bp(rate.coverage_ratio))
                    .and_then(|v| v.checked_mul(bp(share)))
                    .ok_or_else(overflow)?;
                let valued = contributed
                    .checked_mul(win_rate)
                    .and_then(|v| v.checked_mul(acv))
                    .ok_or_else(overflow)?;

                *opportunities = opportunities.checked_add(contributed).ok_or_else(overflow)?;
                *revenue = revenue.checked_add(valued).ok_or_else(overflow)?;
            }
        }

        totals
            .into_iter()
            .map(|(period, (opportunities, revenue))| {
                let overflow =
                    || ForecastError::overflow(format!("what-if projection for {period}"));
                Ok(QuarterProjection {
                    period,
                    opportunities: checked_round_to_i64(opportunities).ok_or_else(overflow)?,
                    revenue: checked_round_to_i64(revenue).ok_or_else(overflow)?,
                })
            })
            .collect()
    }
}

/// Baseline, adjusted and impact for one what-if request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatIfOutcome {
    /// Adjustment that produced this outcome.
    pub adjustment: ScenarioAdjustment,
    /// Projection with the company's own assumptions.
    pub baseline: Vec<QuarterProjection>,
    /// Projection with the adjustment applied.
    pub adjusted: Vec<QuarterProjection>,
    /// Differences between the two.
    pub impact: Impact,
}

impl WhatIfOutcome {
    /// The parameters and totals worth keeping for a named scenario.
    #[must_use]
    pub fn summary(&self, name: impl Into<String>) -> ScenarioSummary {
        let totals = &self.impact.totals;
        ScenarioSummary {
            name: name.into(),
            adjustment: self.adjustment,
            quarters: self.adjusted.len(),
            baseline_revenue: totals.baseline_revenue,
            adjusted_revenue: totals.adjusted_revenue,
            revenue_change: totals.revenue_change,
            revenue_change_percent: totals.revenue_change_percent,
            opportunities_change: totals.opportunities_change,
        }
    }
}

/// Compact record of a what-if run, without the row-level output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Scenario name.
    pub name: String,
    /// Adjustment parameters.
    pub adjustment: ScenarioAdjustment,
    /// Number of projected quarters.
    pub quarters: usize,
    /// Total baseline revenue, cents.
    pub baseline_revenue: i64,
    /// Total adjusted revenue, cents.
    pub adjusted_revenue: i64,
    /// Revenue change, cents.
    pub revenue_change: i64,
    /// Revenue change, percent of baseline.
    pub revenue_change_percent: Decimal,
    /// Opportunity change.
    pub opportunities_change: i64,
}

/// Runs baseline and adjusted projections and compares them.
pub struct WhatIfEngine;

impl WhatIfEngine {
    /// Resolves defaults, applies `adjustment`, projects both sides and
    /// diffs them.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no enabled history or the adjusted
    /// values overflow.
    pub fn run(
        inputs: &ForecastInputs,
        adjustment: &ScenarioAdjustment,
        quarters: u32,
    ) -> Result<WhatIfOutcome, ForecastError> {
        let baseline_assumptions = Assumptions::resolved(inputs);
        let adjusted_assumptions = ScenarioApplier::apply(&baseline_assumptions, adjustment)?;

        let baseline = WhatIfCalculator::project(inputs, &baseline_assumptions, quarters)?;
        let adjusted = WhatIfCalculator::project(inputs, &adjusted_assumptions, quarters)?;
        let impact = ImpactComparator::compare(&baseline, &adjusted);

        Ok(WhatIfOutcome {
            adjustment: *adjustment,
            baseline,
            adjusted,
            impact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::types::{
        ConversionRate, DealEconomics, HistoricalVolume, LeadType, Region,
    };
    use pipecast_shared::types::{CompanyId, LeadTypeId, RegionId};
    use rust_decimal_macros::dec;

    fn period(year: i32, quarter: u8) -> Period {
        Period::new(year, quarter).unwrap()
    }

    fn inputs(history: &[(Period, i64)]) -> ForecastInputs {
        let company_id = CompanyId::new();
        let region = RegionId::new();
        let lead_type = LeadTypeId::new();
        ForecastInputs {
            regions: vec![Region {
                id: region,
                company_id,
                name: "LATAM".into(),
                is_enabled: true,
            }],
            lead_types: vec![LeadType {
                id: lead_type,
                company_id,
                name: "Outbound".into(),
                is_enabled: true,
            }],
            history: history
                .iter()
                .map(|(p, v)| HistoricalVolume {
                    region_id: region,
                    lead_type_id: lead_type,
                    period: *p,
                    volume: *v,
                })
                .collect(),
            conversion_rates: vec![ConversionRate {
                region_id: region,
                lead_type_id: lead_type,
                coverage_ratio: 1_000,
                win_rate_new: 2_000,
                win_rate_upsell: 4_000,
            }],
            deal_economics: vec![DealEconomics {
                region_id: region,
                acv_new: 3_000_000,
                acv_upsell: 1_000_000,
            }],
            time_distributions: vec![],
        }
    }

    #[test]
    fn test_requires_history() {
        let result = WhatIfCalculator::project(&inputs(&[]), &Assumptions::default(), 16);
        assert!(matches!(result, Err(ForecastError::NoHistoricalData)));
    }

    #[test]
    fn test_projects_after_latest_quarter() {
        let inputs = inputs(&[(period(2025, 3), 500), (period(2025, 4), 1_000)]);
        let projection =
            WhatIfCalculator::project(&inputs, &Assumptions::resolved(&inputs), 16).unwrap();

        assert_eq!(projection.len(), 16);
        assert_eq!(projection[0].period, period(2026, 1));
        assert_eq!(projection[15].period, period(2029, 4));
    }

    #[test]
    fn test_lookback_uses_lag_shares_and_averaged_economics() {
        let inputs = inputs(&[(period(2025, 3), 500), (period(2025, 4), 1_000)]);
        let projection =
            WhatIfCalculator::project(&inputs, &Assumptions::resolved(&inputs), 4).unwrap();

        // 2026-Q1: 1000 x 10% x 10% (lag 1) + 500 x 10% x 1% (lag 2) = 10.5
        assert_eq!(projection[0].opportunities, 11);
        // 10.5 x 30% x 2,000,000
        assert_eq!(projection[0].revenue, 6_300_000);
        // 2026-Q2: 1000 x 10% x 1% = 1
        assert_eq!(projection[1].opportunities, 1);
        assert_eq!(projection[1].revenue, 600_000);
        assert_eq!(projection[2].opportunities, 0);
    }

    #[test]
    fn test_unchanged_scenario_has_no_impact() {
        let inputs = inputs(&[(period(2025, 4), 1_000)]);
        let outcome = WhatIfEngine::run(&inputs, &ScenarioAdjustment::default(), 16).unwrap();

        assert_eq!(outcome.baseline, outcome.adjusted);
        assert_eq!(outcome.impact.totals.revenue_change, 0);
        assert_eq!(outcome.impact.totals.revenue_change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_doubling_rates_raises_revenue() {
        let inputs = inputs(&[(period(2025, 4), 1_000)]);
        let adjustment = ScenarioAdjustment {
            conversion_rate_multiplier: Some(20_000),
            ..ScenarioAdjustment::default()
        };
        let outcome = WhatIfEngine::run(&inputs, &adjustment, 16).unwrap();

        // Coverage and win rate both double, so revenue quadruples.
        assert_eq!(outcome.impact.totals.baseline_revenue, 6_600_000);
        assert_eq!(outcome.impact.totals.adjusted_revenue, 26_400_000);
        assert_eq!(outcome.impact.totals.revenue_change_percent, dec!(300));
        assert_eq!(outcome.impact.totals.opportunities_change, 11);
    }

    #[test]
    fn test_summary_keeps_totals_only() {
        let inputs = inputs(&[(period(2025, 4), 1_000)]);
        let adjustment = ScenarioAdjustment {
            acv_new_delta: Some(1_000_000),
            ..ScenarioAdjustment::default()
        };
        let outcome = WhatIfEngine::run(&inputs, &adjustment, 8).unwrap();
        let summary = outcome.summary("Bigger deals");

        assert_eq!(summary.name, "Bigger deals");
        assert_eq!(summary.quarters, 8);
        assert_eq!(summary.adjustment, adjustment);
        assert_eq!(summary.revenue_change, outcome.impact.totals.revenue_change);
        assert!(summary.revenue_change > 0);
    }

    #[test]
    fn test_acv_delta_overflow_is_rejected() {
        let inputs = inputs(&[(period(2025, 4), 1_000)]);
        let adjustment = ScenarioAdjustment {
            acv_new_delta: Some(i64::MAX),
            ..ScenarioAdjustment::default()
        };
        let err = WhatIfEngine::run(&inputs, &adjustment, 16).unwrap_err();
        assert!(matches!(err, ForecastError::Overflow(_)));
    }

    #[test]
    fn test_huge_multiplier_is_rejected() {
        let inputs = inputs(&[(period(2025, 4), 1_000)]);
        let adjustment = ScenarioAdjustment {
            conversion_rate_multiplier: Some(1_000_000_000_000_000),
            ..ScenarioAdjustment::default()
        };
        let err = WhatIfEngine::run(&inputs, &adjustment, 16).unwrap_err();
        assert!(matches!(err, ForecastError::Overflow(_)));
    }

    #[test]
    fn test_revenue_beyond_i64_is_rejected() {
        let mut inputs = inputs(&[(period(2025, 4), i64::MAX)]);
        inputs.conversion_rates[0].coverage_ratio = 10_000;
        inputs.deal_economics[0].acv_new = i64::MAX;
        inputs.deal_economics[0].acv_upsell = i64::MAX;

        let err = WhatIfCalculator::project(&inputs, &Assumptions::resolved(&inputs), 4)
            .unwrap_err();
        assert!(matches!(err, ForecastError::Overflow(_)));
    }
}
