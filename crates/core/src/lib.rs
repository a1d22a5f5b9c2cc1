//! Core business logic for Pipecast.
//!
//! This crate contains pure forecasting logic with ZERO web or database
//! dependencies. Persistence is reached through the
//! [`ForecastStore`](forecast::ForecastStore) trait, which the db crate
//! implements.
//!
//! # Modules
//!
//! - `forecast` - Lead cascade, forecast writer, what-if scenarios and impact

pub mod forecast;
