//! Delivery cost core for the parcel service
//!
//! Parcels are registered without a delivery cost. This crate prices them:
//! the [`scheduler::DeliveryCostScheduler`] fires the
//! [`calculator::CostCalculator`] every minute or on demand, which reads the
//! USD rate through the [`rate_cache::RateCache`] and writes each cost back
//! through a [`store::ParcelStore`].

pub mod calculator;
pub mod clock;
pub mod error;
pub mod models;
pub mod rate_cache;
pub mod rate_source;
pub mod scheduler;
pub mod store;

#[cfg(test)]
mod testing;

pub use calculator::CostCalculator;
pub use error::{DeliveryError, DeliveryResult};
pub use rate_cache::RateCache;
pub use scheduler::{DeliveryCostScheduler, TriggerOutcome};
