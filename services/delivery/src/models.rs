//! Data carried between the rate cache, the parcel store and the calculator

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parcel whose delivery cost has not been computed yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingParcel {
    /// Internal primary key
    pub id: i64,
    pub weight: Decimal,
    pub value: Decimal,
}

/// Exchange rate as stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRate {
    pub rate: Decimal,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of one calculation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationReport {
    /// Rate used for the pass, `None` when there was nothing to price
    pub rate: Option<Decimal>,
    /// Rows that received a cost
    pub priced: usize,
    /// Rows priced by someone else between selection and update
    pub skipped: usize,
    /// Rows whose cost could not be computed or written
    pub failed: usize,
}
