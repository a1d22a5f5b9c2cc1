//! Forecast data types.

use pipecast_shared::types::{CompanyId, LeadTypeId, RegionId};
use serde::{Deserialize, Serialize};

use super::numeric::{BPS_SCALE, defaults};
use super::period::Period;

/// A sales region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region ID.
    pub id: RegionId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name, unique within the company.
    pub name: String,
    /// Disabled regions are skipped by both cascades.
    pub is_enabled: bool,
}

/// A lead source category (inbound, outbound, partner, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadType {
    /// Lead type ID.
    pub id: LeadTypeId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name, unique within the company.
    pub name: String,
    /// Disabled lead types are skipped by both cascades.
    pub is_enabled: bool,
}

/// Actual lead count for one region, lead type and quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalVolume {
    /// Region.
    pub region_id: RegionId,
    /// Lead type.
    pub lead_type_id: LeadTypeId,
    /// Quarter the leads were generated in.
    pub period: Period,
    /// Number of sales-qualified leads.
    pub volume: i64,
}

/// Funnel rates for a region and lead type, all in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRate {
    /// Region.
    pub region_id: RegionId,
    /// Lead type.
    pub lead_type_id: LeadTypeId,
    /// Lead to opportunity rate.
    pub coverage_ratio: i64,
    /// Opportunity to closed-won rate for new business.
    pub win_rate_new: i64,
    /// Opportunity to closed-won rate for upsell.
    pub win_rate_upsell: i64,
}

impl ConversionRate {
    /// Rates used when the company has no stored row for this pair.
    #[must_use]
    pub const fn default_for(region_id: RegionId, lead_type_id: LeadTypeId) -> Self {
        Self {
            region_id,
            lead_type_id,
            coverage_ratio: defaults::COVERAGE_RATIO_BP,
            win_rate_new: defaults::WIN_RATE_NEW_BP,
            win_rate_upsell: defaults::WIN_RATE_UPSELL_BP,
        }
    }
}

/// Average contract values for a region, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealEconomics {
    /// Region.
    pub region_id: RegionId,
    /// New-business ACV.
    pub acv_new: i64,
    /// Upsell ACV.
    pub acv_upsell: i64,
}

impl DealEconomics {
    /// Economics used when the region has no stored row.
    #[must_use]
    pub const fn default_for(region_id: RegionId) -> Self {
        Self {
            region_id,
            acv_new: defaults::ACV_NEW_CENTS,
            acv_upsell: defaults::ACV_UPSELL_CENTS,
        }
    }
}

/// How a quarter's opportunities spread over that quarter and the next two.
///
/// The three shares are meant to sum to 10000 bp, but stored rows are not
/// checked; see [`TimeDistribution::is_normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDistribution {
    /// Lead type.
    pub lead_type_id: LeadTypeId,
    /// Share landing in the lead's own quarter.
    pub same_quarter_pct: i64,
    /// Share landing one quarter later.
    pub next_quarter_pct: i64,
    /// Share landing two quarters later.
    pub two_quarter_pct: i64,
}

impl TimeDistribution {
    /// Distribution used when the lead type has no stored row.
    #[must_use]
    pub const fn default_for(lead_type_id: LeadTypeId) -> Self {
        Self {
            lead_type_id,
            same_quarter_pct: defaults::SAME_QUARTER_BP,
            next_quarter_pct: defaults::NEXT_QUARTER_BP,
            two_quarter_pct: defaults::TWO_QUARTER_BP,
        }
    }

    /// Sum of the three shares.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.same_quarter_pct + self.next_quarter_pct + self.two_quarter_pct
    }

    /// True when the shares add up to exactly 100%.
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.total() == BPS_SCALE
    }

    /// Share for a lag of `offset` quarters, `None` outside the 0-2 window.
    #[must_use]
    pub const fn share_for_lag(&self, offset: i64) -> Option<i64> {
        match offset {
            0 => Some(self.same_quarter_pct),
            1 => Some(self.next_quarter_pct),
            2 => Some(self.two_quarter_pct),
            _ => None,
        }
    }
}

/// Everything the cascades read for one company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastInputs {
    /// All regions, enabled or not.
    pub regions: Vec<Region>,
    /// All lead types, enabled or not.
    pub lead_types: Vec<LeadType>,
    /// Historical lead volume.
    pub history: Vec<HistoricalVolume>,
    /// Stored conversion rates.
    pub conversion_rates: Vec<ConversionRate>,
    /// Stored deal economics.
    pub deal_economics: Vec<DealEconomics>,
    /// Stored time distributions.
    pub time_distributions: Vec<TimeDistribution>,
}

impl ForecastInputs {
    /// Enabled regions, sorted by name.
    #[must_use]
    pub fn enabled_regions(&self) -> Vec<&Region> {
        let mut regions: Vec<&Region> = self.regions.iter().filter(|r| r.is_enabled).collect();
        regions.sort_by(|a, b| a.name.cmp(&b.name));
        regions
    }

    /// Enabled lead types, sorted by name.
    #[must_use]
    pub fn enabled_lead_types(&self) -> Vec<&LeadType> {
        let mut lead_types: Vec<&LeadType> =
            self.lead_types.iter().filter(|l| l.is_enabled).collect();
        lead_types.sort_by(|a, b| a.name.cmp(&b.name));
        lead_types
    }

    /// History rows whose region and lead type are both enabled.
    pub fn enabled_history(&self) -> impl Iterator<Item = &HistoricalVolume> {
        self.history.iter().filter(|h| {
            self.regions
                .iter()
                .any(|r| r.id == h.region_id && r.is_enabled)
                && self
                    .lead_types
                    .iter()
                    .any(|l| l.id == h.lead_type_id && l.is_enabled)
        })
    }

    /// Most recent quarter with enabled history.
    #[must_use]
    pub fn latest_period(&self) -> Option<Period> {
        self.enabled_history().map(|h| h.period).max()
    }
}

/// One cascade output cell, keyed by names as the writer resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Region name.
    pub region: String,
    /// Lead type name.
    pub lead_type: String,
    /// Target quarter.
    pub period: Period,
    /// Historical lead volume in the target quarter.
    pub sql_volume: i64,
    /// Opportunities landing in the target quarter, rounded.
    pub opportunities: i64,
    /// New-business revenue in cents.
    pub revenue: i64,
}

/// A persisted forecast row.
///
/// `predicted_opportunities` is scaled by
/// [`OPPORTUNITY_PRECISION`](super::numeric::OPPORTUNITY_PRECISION).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Owning company.
    pub company_id: CompanyId,
    /// Region.
    pub region_id: RegionId,
    /// Lead type.
    pub lead_type_id: LeadTypeId,
    /// Quarter.
    pub period: Period,
    /// Predicted lead count.
    pub predicted_leads: i64,
    /// Predicted opportunities x 100.
    pub predicted_opportunities: i64,
    /// New-business share of revenue, cents.
    pub predicted_revenue_new: i64,
    /// Upsell share of revenue, cents.
    pub predicted_revenue_upsell: i64,
}
