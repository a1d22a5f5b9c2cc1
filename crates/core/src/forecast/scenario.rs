//! What-if scenario adjustments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::assumptions::Assumptions;
use super::error::ForecastError;
use super::numeric::{BPS_SCALE, checked_scale_by_bp, round_to_i64};
use super::types::{ConversionRate, DealEconomics, TimeDistribution};

/// Deltas and multipliers for a what-if run. Unset fields leave the
/// baseline untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    /// Multiplier for every funnel rate, fixed-point with 10000 = 1.0x.
    #[serde(default)]
    pub conversion_rate_multiplier: Option<i64>,
    /// Cents added to new-business ACV (may be negative).
    #[serde(default)]
    pub acv_new_delta: Option<i64>,
    /// Cents added to upsell ACV (may be negative).
    #[serde(default)]
    pub acv_upsell_delta: Option<i64>,
    /// Basis points added to the same-quarter share.
    #[serde(default)]
    pub same_quarter_delta: Option<i64>,
    /// Basis points added to the next-quarter share.
    #[serde(default)]
    pub next_quarter_delta: Option<i64>,
    /// Basis points added to the two-quarter share.
    #[serde(default)]
    pub two_quarter_delta: Option<i64>,
}

impl ScenarioAdjustment {
    /// True when nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.conversion_rate_multiplier.is_none()
            && self.acv_new_delta.is_none()
            && self.acv_upsell_delta.is_none()
            && !self.touches_time_distribution()
    }

    /// True when any lag-share delta is set.
    #[must_use]
    pub const fn touches_time_distribution(&self) -> bool {
        self.same_quarter_delta.is_some()
            || self.next_quarter_delta.is_some()
            || self.two_quarter_delta.is_some()
    }
}

/// Applies a [`ScenarioAdjustment`] to baseline assumptions.
pub struct ScenarioApplier;

impl ScenarioApplier {
    /// Returns adjusted copies of every rate, economics and distribution row.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Overflow`] if an adjusted value does not fit
    /// in an `i64`.
    pub fn apply(
        baseline: &Assumptions,
        adjustment: &ScenarioAdjustment,
    ) -> Result<Assumptions, ForecastError> {
        Ok(Assumptions {
            conversion_rates: baseline
                .conversion_rates
                .iter()
                .map(|rate| Self::adjust_conversion_rate(*rate, adjustment))
                .collect::<Result<_, _>>()?,
            deal_economics: baseline
                .deal_economics
                .iter()
                .map(|economics| Self::adjust_deal_economics(*economics, adjustment))
                .collect::<Result<_, _>>()?,
            time_distributions: baseline
                .time_distributions
                .iter()
                .map(|distribution| Self::adjust_time_distribution(*distribution, adjustment))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Scales all three funnel rates by the multiplier, rounding each.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Overflow`] if a scaled rate overflows.
    pub fn adjust_conversion_rate(
        rate: ConversionRate,
        adjustment: &ScenarioAdjustment,
    ) -> Result<ConversionRate, ForecastError> {
        let Some(multiplier) = adjustment.conversion_rate_multiplier else {
            return Ok(rate);
        };
        let scale = |value: i64, field: &str| {
            checked_scale_by_bp(value, multiplier).ok_or_else(|| {
                ForecastError::overflow(format!("{field} scaled by {multiplier} bp"))
            })
        };
        Ok(ConversionRate {
            coverage_ratio: scale(rate.coverage_ratio, "coverage_ratio")?,
            win_rate_new: scale(rate.win_rate_new, "win_rate_new")?,
            win_rate_upsell: scale(rate.win_rate_upsell, "win_rate_upsell")?,
            ..rate
        })
    }

    /// Adds the ACV deltas. Results are not floored at zero.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Overflow`] if a sum overflows.
    pub fn adjust_deal_economics(
        economics: DealEconomics,
        adjustment: &ScenarioAdjustment,
    ) -> Result<DealEconomics, ForecastError> {
        Ok(DealEconomics {
            acv_new: shift(economics.acv_new, adjustment.acv_new_delta, "acv_new")?,
            acv_upsell: shift(economics.acv_upsell, adjustment.acv_upsell_delta, "acv_upsell")?,
            ..economics
        })
    }

    /// Adds the lag deltas, renormalizes to 10000 bp, then clamps each share
    /// to 0..=10000.
    ///
    /// Clamping runs after renormalizing, so a delta that drives a share
    /// negative leaves a total above 10000. That result is accepted as is.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Overflow`] if a shifted share overflows.
    pub fn adjust_time_distribution(
        distribution: TimeDistribution,
        adjustment: &ScenarioAdjustment,
    ) -> Result<TimeDistribution, ForecastError> {
        if !adjustment.touches_time_distribution() {
            return Ok(distribution);
        }

        let shifted = [
            shift(
                distribution.same_quarter_pct,
                adjustment.same_quarter_delta,
                "same_quarter_pct",
            )?,
            shift(
                distribution.next_quarter_pct,
                adjustment.next_quarter_delta,
                "next_quarter_pct",
            )?,
            shift(
                distribution.two_quarter_pct,
                adjustment.two_quarter_delta,
                "two_quarter_pct",
            )?,
        ];
        let [same, next, two] = Self::renormalize(shifted).map(|v| v.clamp(0, BPS_SCALE));

        Ok(TimeDistribution {
            same_quarter_pct: same,
            next_quarter_pct: next,
            two_quarter_pct: two,
            ..distribution
        })
    }

    /// Scales the shares proportionally so they sum to exactly 10000.
    ///
    /// Rounding residue goes to the largest share. A non-positive total
    /// cannot be scaled and is returned unchanged. Shares that scale past
    /// the `i64` range saturate.
    #[must_use]
    pub fn renormalize(shares: [i64; 3]) -> [i64; 3] {
        let total: Decimal = shares.iter().copied().map(Decimal::from).sum();
        if total <= Decimal::ZERO {
            return shares;
        }

        let mut scaled = shares.map(|v| {
            round_to_i64(Decimal::from(v) * Decimal::from(BPS_SCALE) / total)
        });

        let sum = scaled.iter().fold(0i64, |acc, v| acc.saturating_add(*v));
        let residue = BPS_SCALE.saturating_sub(sum);
        if residue != 0 {
            let largest = (0..scaled.len())
                .max_by_key(|&i| (scaled[i], std::cmp::Reverse(i)))
                .unwrap_or(0);
            scaled[largest] = scaled[largest].saturating_add(residue);
        }
        scaled
    }
}

fn shift(value: i64, delta: Option<i64>, field: &str) -> Result<i64, ForecastError> {
    value
        .checked_add(delta.unwrap_or(0))
        .ok_or_else(|| ForecastError::overflow(format!("{field} delta")))
}
