//! `SeaORM` entity prelude.

pub use super::companies::Entity as Companies;
pub use super::conversion_rates::Entity as ConversionRates;
pub use super::deal_economics::Entity as DealEconomics;
pub use super::forecasts::Entity as Forecasts;
pub use super::historical_volumes::Entity as HistoricalVolumes;
pub use super::lead_types::Entity as LeadTypes;
pub use super::regions::Entity as Regions;
pub use super::time_distributions::Entity as TimeDistributions;
