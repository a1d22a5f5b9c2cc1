//! `SeaORM` entity definitions.

pub mod prelude;

pub mod companies;
pub mod conversion_rates;
pub mod deal_economics;
pub mod forecasts;
pub mod historical_volumes;
pub mod lead_types;
pub mod regions;
pub mod time_distributions;
