//! Rate, economics and time-distribution lookups with default substitution.

use std::collections::HashMap;

use pipecast_shared::types::{LeadTypeId, RegionId};
use serde::{Deserialize, Serialize};

use super::period::Period;
use super::types::{ConversionRate, DealEconomics, ForecastInputs, TimeDistribution};

/// The adjustable assumptions behind a forecast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Conversion rates per region and lead type.
    pub conversion_rates: Vec<ConversionRate>,
    /// Deal economics per region.
    pub deal_economics: Vec<DealEconomics>,
    /// Time distributions per lead type.
    pub time_distributions: Vec<TimeDistribution>,
}

impl Assumptions {
    /// Stored rows only, exactly as loaded.
    #[must_use]
    pub fn stored(inputs: &ForecastInputs) -> Self {
        Self {
            conversion_rates: inputs.conversion_rates.clone(),
            deal_economics: inputs.deal_economics.clone(),
            time_distributions: inputs.time_distributions.clone(),
        }
    }

    /// One row for every enabled region, lead type and pair, with defaults
    /// filled in where nothing is stored.
    ///
    /// Scenario adjustments are applied to this form so that defaulted
    /// pairs are adjusted too.
    #[must_use]
    pub fn resolved(inputs: &ForecastInputs) -> Self {
        let index = AssumptionIndex::new(&Self::stored(inputs));
        let regions = inputs.enabled_regions();
        let lead_types = inputs.enabled_lead_types();

        let conversion_rates = regions
            .iter()
            .flat_map(|r| {
                lead_types
                    .iter()
                    .map(|l| index.conversion_rate(r.id, l.id))
            })
            .collect();
        let deal_economics = regions.iter().map(|r| index.deal_economics(r.id)).collect();
        let time_distributions = lead_types
            .iter()
            .map(|l| index.time_distribution(l.id))
            .collect();

        Self {
            conversion_rates,
            deal_economics,
            time_distributions,
        }
    }
}

/// Hash lookups over [`Assumptions`] that fall back to defaults on a miss.
#[derive(Debug, Clone, Default)]
pub struct AssumptionIndex {
    rates: HashMap<(RegionId, LeadTypeId), ConversionRate>,
    economics: HashMap<RegionId, DealEconomics>,
    distributions: HashMap<LeadTypeId, TimeDistribution>,
}

impl AssumptionIndex {
    /// Builds the index. Later duplicates win.
    #[must_use]
    pub fn new(assumptions: &Assumptions) -> Self {
        Self {
            rates: assumptions
                .conversion_rates
                .iter()
                .map(|r| ((r.region_id, r.lead_type_id), *r))
                .collect(),
            economics: assumptions
                .deal_economics
                .iter()
                .map(|e| (e.region_id, *e))
                .collect(),
            distributions: assumptions
                .time_distributions
                .iter()
                .map(|d| (d.lead_type_id, *d))
                .collect(),
        }
    }

    /// Stored or default conversion rate.
    #[must_use]
    pub fn conversion_rate(&self, region_id: RegionId, lead_type_id: LeadTypeId) -> ConversionRate {
        self.rates
            .get(&(region_id, lead_type_id))
            .copied()
            .unwrap_or_else(|| ConversionRate::default_for(region_id, lead_type_id))
    }

    /// Stored or default deal economics.
    #[must_use]
    pub fn deal_economics(&self, region_id: RegionId) -> DealEconomics {
        self.economics
            .get(&region_id)
            .copied()
            .unwrap_or_else(|| DealEconomics::default_for(region_id))
    }

    /// Stored or default time distribution.
    #[must_use]
    pub fn time_distribution(&self, lead_type_id: LeadTypeId) -> TimeDistribution {
        self.distributions
            .get(&lead_type_id)
            .copied()
            .unwrap_or_else(|| TimeDistribution::default_for(lead_type_id))
    }

    /// Number of stored rows, for logging how much was defaulted.
    #[must_use]
    pub fn stored_counts(&self) -> (usize, usize, usize) {
        (self.rates.len(), self.economics.len(), self.distributions.len())
    }
}

/// Lead volume by region, lead type and quarter. Missing cells read as zero.
#[derive(Debug, Clone, Default)]
pub struct VolumeIndex {
    volumes: HashMap<(RegionId, LeadTypeId, Period), i64>,
}

impl VolumeIndex {
    /// Indexes every history row. Later duplicates win.
    #[must_use]
    pub fn new(inputs: &ForecastInputs) -> Self {
        Self {
            volumes: inputs
                .history
                .iter()
                .map(|h| ((h.region_id, h.lead_type_id, h.period), h.volume))
                .collect(),
        }
    }

    /// Lead volume, zero when no row exists.
    #[must_use]
    pub fn volume(&self, region_id: RegionId, lead_type_id: LeadTypeId, period: Period) -> i64 {
        self.volumes
            .get(&(region_id, lead_type_id, period))
            .copied()
            .unwrap_or(0)
    }
}
