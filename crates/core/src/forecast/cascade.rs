//! Lead → opportunity → revenue cascade for the persisted forecast.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::assumptions::{AssumptionIndex, Assumptions, VolumeIndex};
use super::numeric::{bp, round_to_i64};
use super::period::Period;
use super::types::{CascadeResult, ForecastInputs};

/// Quarters per forecast year.
pub const QUARTERS_PER_YEAR: u32 = 4;

/// Computes per-region, per-lead-type, per-quarter forecasts.
pub struct CascadeCalculator;

impl CascadeCalculator {
    /// Runs the cascade over `4 × horizon_years` quarters starting at `start`.
    ///
    /// Opportunities landing in quarter Q come from leads generated in Q,
    /// Q−1 and Q−2, weighted by the lead type's same/next/two-quarter
    /// shares. Only quarters inside the horizon contribute, so the first
    /// forecast quarter sees no lag from before `start`.
    ///
    /// Output is ordered by region name, lead type name, then quarter.
    /// Values past the `i64` range saturate.
    #[must_use]
    pub fn run(inputs: &ForecastInputs, start: Period, horizon_years: u32) -> Vec<CascadeResult> {
        let quarters: Vec<Period> = start.horizon(horizon_years * QUARTERS_PER_YEAR).collect();
        let volumes = VolumeIndex::new(inputs);
        let assumptions = AssumptionIndex::new(&Assumptions::stored(inputs));
        let regions = inputs.enabled_regions();
        let lead_types = inputs.enabled_lead_types();

        let (rates, economics, distributions) = assumptions.stored_counts();
        debug!(
            regions = regions.len(),
            lead_types = lead_types.len(),
            stored_rates = rates,
            stored_economics = economics,
            stored_distributions = distributions,
            "Running forecast cascade"
        );

        for lead_type in &lead_types {
            let distribution = assumptions.time_distribution(lead_type.id);
            if !distribution.is_normalized() {
                warn!(
                    lead_type = %lead_type.name,
                    total_bp = distribution.total(),
                    "Time distribution does not sum to 10000 bp"
                );
            }
        }

        let mut results =
            Vec::with_capacity(regions.len() * lead_types.len() * quarters.len());

        for region in &regions {
            let acv_new = Decimal::from(assumptions.deal_economics(region.id).acv_new);

            for lead_type in &lead_types {
                let rate = assumptions.conversion_rate(region.id, lead_type.id);
                let distribution = assumptions.time_distribution(lead_type.id);
                let coverage = bp(rate.coverage_ratio);
                let win_rate = bp(rate.win_rate_new);

                let lead_volumes: Vec<i64> = quarters
                    .iter()
                    .map(|q| volumes.volume(region.id, lead_type.id, *q))
                    .collect();
                let base_opportunities: Vec<Decimal> = lead_volumes
                    .iter()
                    .map(|v| Decimal::from(*v).saturating_mul(coverage))
                    .collect();

                for (offset, period) in quarters.iter().enumerate() {
                    let mut total_opportunities = base_opportunities[offset]
                        .saturating_mul(bp(distribution.same_quarter_pct));
                    if offset >= 1 {
                        total_opportunities = total_opportunities.saturating_add(
                            base_opportunities[offset - 1]
                                .saturating_mul(bp(distribution.next_quarter_pct)),
                        );
                    }
                    if offset >= 2 {
                        total_opportunities = total_opportunities.saturating_add(
                            base_opportunities[offset - 2]
                                .saturating_mul(bp(distribution.two_quarter_pct)),
                        );
                    }

                    let closed_won = total_opportunities.saturating_mul(win_rate);

                    results.push(CascadeResult {
                        region: region.name.clone(),
                        lead_type: lead_type.name.clone(),
                        period: *period,
                        sql_volume: lead_volumes[offset],
                        opportunities: round_to_i64(total_opportunities),
                        revenue: round_to_i64(closed_won.saturating_mul(acv_new)),
                    });
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::types::{
        ConversionRate, DealEconomics, HistoricalVolume, LeadType, Region, TimeDistribution,
    };
    use pipecast_shared::types::{CompanyId, LeadTypeId, RegionId};

    struct Fixture {
        inputs: ForecastInputs,
        lead_type: LeadTypeId,
    }

    fn period(year: i32, quarter: u8) -> Period {
        Period::new(year, quarter).unwrap()
    }

    /// One region, one lead type, 5% coverage, 25% win rate, $50k ACV,
    /// 89/10/1 lag split.
    fn single_cell(volume_at: Period, volume: i64) -> Fixture {
        let company_id = CompanyId::new();
        let region = RegionId::new();
        let lead_type = LeadTypeId::new();
        Fixture {
            inputs: ForecastInputs {
                regions: vec![Region {
                    id: region,
                    company_id,
                    name: "EMEA".into(),
                    is_enabled: true,
                }],
                lead_types: vec![LeadType {
                    id: lead_type,
                    company_id,
                    name: "Inbound".into(),
                    is_enabled: true,
                }],
                history: vec![HistoricalVolume {
                    region_id: region,
                    lead_type_id: lead_type,
                    period: volume_at,
                    volume,
                }],
                conversion_rates: vec![ConversionRate {
                    region_id: region,
                    lead_type_id: lead_type,
                    coverage_ratio: 500,
                    win_rate_new: 2_500,
                    win_rate_upsell: 2_500,
                }],
                deal_economics: vec![DealEconomics {
                    region_id: region,
                    acv_new: 5_000_000,
                    acv_upsell: 2_000_000,
                }],
                time_distributions: vec![TimeDistribution {
                    lead_type_id: lead_type,
                    same_quarter_pct: 8_900,
                    next_quarter_pct: 1_000,
                    two_quarter_pct: 100,
                }],
            },
            lead_type,
        }
    }

    #[test]
    fn test_produces_one_row_per_cell_and_quarter() {
        let fixture = single_cell(period(2026, 1), 100);
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 2);
        assert_eq!(results.len(), 8);
        assert_eq!(results[0].period, period(2026, 1));
        assert_eq!(results[7].period, period(2027, 4));
    }

    #[test]
    fn test_lag_window_spreads_opportunities() {
        let fixture = single_cell(period(2026, 1), 100);
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);

        // 100 leads x 5% = 5 base opportunities
        assert_eq!(results[0].sql_volume, 100);
        assert_eq!(results[0].opportunities, 4); // 4.45
        assert_eq!(results[1].opportunities, 1); // 0.5
        assert_eq!(results[2].opportunities, 0); // 0.05
        assert_eq!(results[3].opportunities, 0);
        assert_eq!(results[1].sql_volume, 0);
    }

    #[test]
    fn test_revenue_uses_unrounded_opportunities() {
        let fixture = single_cell(period(2026, 1), 100);
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);

        // 4.45 x 25% x 5,000,000
        assert_eq!(results[0].revenue, 5_562_500);
        // 0.5 x 25% x 5,000,000
        assert_eq!(results[1].revenue, 625_000);
        // 0.05 x 25% x 5,000,000
        assert_eq!(results[2].revenue, 62_500);
    }

    #[test]
    fn test_no_lookback_before_start() {
        let fixture = single_cell(period(2025, 4), 1_000);
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);
        assert!(results.iter().all(|r| r.opportunities == 0 && r.revenue == 0));
    }

    #[test]
    fn test_zero_coverage_zeroes_everything() {
        let mut fixture = single_cell(period(2026, 1), 1_000_000);
        fixture.inputs.conversion_rates[0].coverage_ratio = 0;
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);
        assert!(results.iter().all(|r| r.opportunities == 0 && r.revenue == 0));
        assert_eq!(results[0].sql_volume, 1_000_000);
    }

    #[test]
    fn test_defaults_apply_without_stored_rows() {
        let mut fixture = single_cell(period(2026, 1), 100);
        fixture.inputs.conversion_rates.clear();
        fixture.inputs.deal_economics.clear();
        fixture.inputs.time_distributions.clear();
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);

        // 100 x 5% x 89% = 4.45, x 25% x 10,000,000
        assert_eq!(results[0].opportunities, 4);
        assert_eq!(results[0].revenue, 11_125_000);
    }

    #[test]
    fn test_disabled_lead_type_is_skipped() {
        let mut fixture = single_cell(period(2026, 1), 100);
        fixture.inputs.lead_types[0].is_enabled = false;
        assert!(CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1).is_empty());
    }

    #[test]
    fn test_two_quarter_lag_contributes() {
        let mut fixture = single_cell(period(2026, 1), 1_000);
        fixture.inputs.time_distributions[0] = TimeDistribution {
            lead_type_id: fixture.lead_type,
            same_quarter_pct: 0,
            next_quarter_pct: 0,
            two_quarter_pct: 10_000,
        };
        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);
        assert_eq!(results[0].opportunities, 0);
        assert_eq!(results[1].opportunities, 0);
        assert_eq!(results[2].opportunities, 50);
    }

    #[test]
    fn test_identical_inputs_give_identical_output() {
        let fixture = single_cell(period(2026, 2), 321);
        let first = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 3);
        let second = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_extreme_stored_values_saturate() {
        let mut fixture = single_cell(period(2026, 1), i64::MAX);
        fixture.inputs.conversion_rates[0].coverage_ratio = i64::MAX;
        fixture.inputs.deal_economics[0].acv_new = i64::MAX;

        let results = CascadeCalculator::run(&fixture.inputs, period(2026, 1), 1);
        assert_eq!(results[0].opportunities, i64::MAX);
        assert_eq!(results[0].revenue, i64::MAX);
    }
}
