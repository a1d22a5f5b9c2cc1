//! Sales pipeline forecasting.
//!
//! The persisted path runs [`CascadeCalculator`] and hands its output to
//! [`ForecastWriter`]. The what-if path applies a [`ScenarioAdjustment`] to
//! the resolved assumptions and compares two [`WhatIfCalculator`]
//! projections with [`ImpactComparator`].

pub mod assumptions;
pub mod cascade;
pub mod error;
pub mod impact;
pub mod lock;
pub mod memory;
pub mod numeric;
pub mod period;
pub mod scenario;
pub mod service;
pub mod store;
pub mod types;
pub mod what_if;
pub mod writer;


pub use assumptions::{AssumptionIndex, Assumptions, VolumeIndex};
pub use cascade::{CascadeCalculator, QUARTERS_PER_YEAR};
pub use error::ForecastError;
pub use impact::{Impact, ImpactComparator, ImpactTotals, QuarterImpact, percent_change};
pub use lock::{CompanyLockGuard, CompanyLocks};
pub use memory::InMemoryForecastStore;
pub use numeric::{BPS_SCALE, OPPORTUNITY_PRECISION};
pub use period::Period;
pub use scenario::{ScenarioAdjustment, ScenarioApplier};
pub use service::{ForecastService, HORIZON_YEARS, RecalculationSummary};
pub use store::ForecastStore;
pub use types::{
    CascadeResult, ConversionRate, DealEconomics, ForecastInputs, ForecastRow, HistoricalVolume,
    LeadType, Region, TimeDistribution,
};
pub use what_if::{QuarterProjection, ScenarioSummary, WhatIfCalculator, WhatIfEngine, WhatIfOutcome};
pub use writer::{DEFAULT_REVENUE_NEW_SHARE_BP, ForecastWriter, RevenueSplit};
