//! Error types for the delivery cost core

use common::error::{CacheError, DatabaseError};
use thiserror::Error;

/// Errors raised while fetching rates, caching them or pricing parcels
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The outbound request to the rate source failed
    #[error("Rate source request failed: {0}")]
    RateRequest(#[from] reqwest::Error),

    /// The rate source answered with a body we could not read a rate from
    #[error("Unexpected rate payload: {0}")]
    RatePayload(String),

    /// The cache backend failed
    #[error("Rate cache error: {0}")]
    Cache(#[from] CacheError),

    /// A cache entry could not be encoded
    #[error("Rate cache encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Reading or writing parcels failed
    #[error("Parcel store error: {0}")]
    Store(#[from] DatabaseError),

    /// The cost formula left the representable decimal range
    #[error("Delivery cost overflow for parcel {0}")]
    CostOverflow(i64),

    /// The cron scheduler rejected a job or failed to start
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Type alias for delivery results
pub type DeliveryResult<T> = Result<T, DeliveryError>;
