//! Baseline vs adjusted comparison.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::Period;
use super::what_if::QuarterProjection;

/// Change for a single quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterImpact {
    /// Quarter.
    pub period: Period,
    /// Baseline revenue, cents.
    pub baseline_revenue: i64,
    /// Adjusted revenue, cents.
    pub adjusted_revenue: i64,
    /// Adjusted minus baseline, cents.
    pub revenue_change: i64,
    /// Change as a percentage of baseline; zero when baseline is zero.
    pub revenue_change_percent: Decimal,
    /// Baseline opportunities.
    pub baseline_opportunities: i64,
    /// Adjusted opportunities.
    pub adjusted_opportunities: i64,
}

/// Totals across every compared quarter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactTotals {
    /// Sum of baseline revenue, cents.
    pub baseline_revenue: i64,
    /// Sum of adjusted revenue, cents.
    pub adjusted_revenue: i64,
    /// Adjusted minus baseline, cents.
    pub revenue_change: i64,
    /// Change as a percentage of baseline; zero when baseline is zero.
    pub revenue_change_percent: Decimal,
    /// Sum of baseline opportunities.
    pub baseline_opportunities: i64,
    /// Sum of adjusted opportunities.
    pub adjusted_opportunities: i64,
    /// Adjusted minus baseline opportunities.
    pub opportunities_change: i64,
    /// Change as a percentage of baseline; zero when baseline is zero.
    pub opportunities_change_percent: Decimal,
}

/// Quarter-by-quarter and total impact of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    /// Per-quarter changes in chronological order.
    pub quarters: Vec<QuarterImpact>,
    /// Aggregate changes.
    pub totals: ImpactTotals,
}

/// Diffs two quarterly projections.
pub struct ImpactComparator;

impl ImpactComparator {
    /// Aligns both sides by quarter and computes absolute and percentage
    /// changes. A quarter present on only one side counts as zero on the other.
    /// Sums and differences saturate at the `i64` bounds.
    #[must_use]
    pub fn compare(baseline: &[QuarterProjection], adjusted: &[QuarterProjection]) -> Impact {
        let mut aligned: BTreeMap<Period, (i64, i64, i64, i64)> = BTreeMap::new();
        for row in baseline {
            let cell = aligned.entry(row.period).or_default();
            cell.0 = cell.0.saturating_add(row.revenue);
            cell.2 = cell.2.saturating_add(row.opportunities);
        }
        for row in adjusted {
            let cell = aligned.entry(row.period).or_default();
            cell.1 = cell.1.saturating_add(row.revenue);
            cell.3 = cell.3.saturating_add(row.opportunities);
        }

        let mut totals = ImpactTotals::default();
        let quarters = aligned
            .into_iter()
            .map(
                |(period, (base_rev, adj_rev, base_opps, adj_opps))| {
                    totals.baseline_revenue = totals.baseline_revenue.saturating_add(base_rev);
                    totals.adjusted_revenue = totals.adjusted_revenue.saturating_add(adj_rev);
                    totals.baseline_opportunities =
                        totals.baseline_opportunities.saturating_add(base_opps);
                    totals.adjusted_opportunities =
                        totals.adjusted_opportunities.saturating_add(adj_opps);
                    let revenue_change = adj_rev.saturating_sub(base_rev);

                    QuarterImpact {
                        period,
                        baseline_revenue: base_rev,
                        adjusted_revenue: adj_rev,
                        revenue_change,
                        revenue_change_percent: percent_change(revenue_change, base_rev),
                        baseline_opportunities: base_opps,
                        adjusted_opportunities: adj_opps,
                    }
                },
            )
            .collect();

        totals.revenue_change = totals.adjusted_revenue.saturating_sub(totals.baseline_revenue);
        totals.revenue_change_percent =
            percent_change(totals.revenue_change, totals.baseline_revenue);
        totals.opportunities_change = totals
            .adjusted_opportunities
            .saturating_sub(totals.baseline_opportunities);
        totals.opportunities_change_percent =
            percent_change(totals.opportunities_change, totals.baseline_opportunities);

        Impact { quarters, totals }
    }
}

/// `change / base × 100` rounded to two places, or zero when `base` is not
/// positive.
#[must_use]
pub fn percent_change(change: i64, base: i64) -> Decimal {
    if base <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(change) / Decimal::from(base) * Decimal::ONE_HUNDRED).round_dp(2)
}
