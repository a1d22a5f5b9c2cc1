//! Repository implementations for data access.

pub mod forecast;

pub use forecast::ForecastRepository;
