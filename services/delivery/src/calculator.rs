//! Delivery cost calculation
//!
//! `cost = (weight × 0.5 + value × 0.01) × rate`, in decimal arithmetic and
//! rounded to cents. Each parcel is written by its own statement; a pass that
//! stops halfway leaves the rest for the next one.

use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    error::{DeliveryError, DeliveryResult},
    models::CalculationReport,
    rate_cache::RateCache,
    store::ParcelStore,
};

/// Cost per unit of weight, in USD
pub const WEIGHT_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Share of the declared value charged, in USD per USD
pub const VALUE_FACTOR: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const COST_SCALE: u32 = 2;

/// Compute the delivery cost of a parcel in the local currency
///
/// Returns `None` if the result does not fit in a `Decimal`.
pub fn delivery_cost(weight: Decimal, value: Decimal, rate: Decimal) -> Option<Decimal> {
    let usd = weight
        .checked_mul(WEIGHT_FACTOR)?
        .checked_add(value.checked_mul(VALUE_FACTOR)?)?;

    Some(
        usd.checked_mul(rate)?
            .round_dp_with_strategy(COST_SCALE, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// Prices every pending parcel using the cached exchange rate
#[derive(Clone)]
pub struct CostCalculator {
    store: Arc<dyn ParcelStore>,
    rates: RateCache,
}

impl CostCalculator {
    pub fn new(store: Arc<dyn ParcelStore>, rates: RateCache) -> Self {
        Self { store, rates }
    }

    /// Price all parcels that have no delivery cost yet
    ///
    /// A rate or selection failure aborts the pass. A failure on a single row
    /// is logged and counted; the remaining rows are still processed.
    pub async fn compute_all_pending(&self) -> DeliveryResult<CalculationReport> {
        let pending = self.store.pending_parcels().await?;
        if pending.is_empty() {
            debug!("No pending parcels to price");
            return Ok(CalculationReport::default());
        }

        let rate = self.rates.get_rate().await?;
        info!("Pricing {} pending parcels at rate {}", pending.len(), rate);

        let mut report = CalculationReport {
            rate: Some(rate),
            ..CalculationReport::default()
        };

        for parcel in pending {
            let Some(cost) = delivery_cost(parcel.weight, parcel.value, rate) else {
                error!("{}", DeliveryError::CostOverflow(parcel.id));
                report.failed += 1;
                continue;
            };

            match self.store.record_delivery_cost(parcel.id, cost).await {
                Ok(true) => {
                    debug!("Parcel {} priced at {}", parcel.id, cost);
                    report.priced += 1;
                }
                Ok(false) => {
                    debug!("Parcel {} was already priced", parcel.id);
                    report.skipped += 1;
                }
                Err(e) => {
                    error!("Failed to store delivery cost for parcel {}: {}", parcel.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Delivery cost pass finished: {} priced, {} skipped, {} failed",
            report.priced, report.skipped, report.failed
        );
        Ok(report)
    }
}
