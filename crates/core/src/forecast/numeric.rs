//! Fixed-point helpers for basis points and cents.
//!
//! CRITICAL: Never use floating-point for rates or money.
//! Rates are integer basis points (10000 = 100%), money is integer cents,
//! and anything fractional in between is carried as `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Basis points in one whole (100%).
pub const BPS_SCALE: i64 = 10_000;

/// Multiplier applied to opportunities at the persisted-row boundary.
pub const OPPORTUNITY_PRECISION: i64 = 100;

/// Values substituted when a company has no stored row.
pub mod defaults {
    /// Lead to opportunity coverage (5%).
    pub const COVERAGE_RATIO_BP: i64 = 500;
    /// New-business win rate (25%).
    pub const WIN_RATE_NEW_BP: i64 = 2_500;
    /// Upsell win rate (25%).
    pub const WIN_RATE_UPSELL_BP: i64 = 2_500;
    /// New-business ACV ($100,000).
    pub const ACV_NEW_CENTS: i64 = 10_000_000;
    /// Upsell ACV ($50,000).
    pub const ACV_UPSELL_CENTS: i64 = 5_000_000;
    /// Share of opportunities landing in the lead's own quarter.
    pub const SAME_QUARTER_BP: i64 = 8_900;
    /// Share landing one quarter later.
    pub const NEXT_QUARTER_BP: i64 = 1_000;
    /// Share landing two quarters later.
    pub const TWO_QUARTER_BP: i64 = 100;
}

/// Converts basis points to a decimal fraction (2500 -> 0.25).
#[must_use]
pub fn bp(value: i64) -> Decimal {
    Decimal::from(value) / Decimal::from(BPS_SCALE)
}

/// Rounds to the nearest integer, halves away from zero.
///
/// Saturates at the `i64` bounds instead of wrapping.
#[must_use]
pub fn round_to_i64(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Rounds to the nearest integer, or `None` when the result does not fit
/// in an `i64`.
#[must_use]
pub fn checked_round_to_i64(value: Decimal) -> Option<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Scales an integer by a basis-point factor and rounds the result.
///
/// `scale_by_bp(2500, 20000)` doubles 25% to 50%. Saturates at the `i64`
/// bounds.
#[must_use]
pub fn scale_by_bp(value: i64, factor_bp: i64) -> i64 {
    round_to_i64(Decimal::from(value).saturating_mul(bp(factor_bp)))
}

/// Like [`scale_by_bp`], but `None` on overflow instead of saturating.
#[must_use]
pub fn checked_scale_by_bp(value: i64, factor_bp: i64) -> Option<i64> {
    Decimal::from(value)
        .checked_mul(bp(factor_bp))
        .and_then(checked_round_to_i64)
}
