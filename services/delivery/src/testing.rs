//! In-memory doubles shared by the unit tests

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::Notify;

use crate::{
    clock::SystemClock,
    error::{DeliveryError, DeliveryResult},
    models::PendingParcel,
    rate_cache::{DEFAULT_RATE_CACHE_KEY, DEFAULT_RATE_TTL, MemoryCacheStore, RateCache},
    rate_source::RateSource,
    store::ParcelStore,
};

#[derive(Default)]
struct Rows {
    next_id: i64,
    rows: BTreeMap<i64, (Decimal, Decimal, Option<Decimal>)>,
    price_on_select: Vec<(i64, Decimal)>,
    writes: usize,
}

/// Parcel table kept in a map
#[derive(Default)]
pub struct MemoryParcelStore {
    rows: Mutex<Rows>,
    gate: Option<Arc<Notify>>,
}

impl MemoryParcelStore {
    /// A store whose selection waits until `gate` is notified
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            rows: Mutex::default(),
            gate: Some(gate),
        }
    }

    pub fn insert(&self, weight: Decimal, value: Decimal) -> i64 {
        let mut rows = self.rows.lock().unwrap();
        rows.next_id += 1;
        let id = rows.next_id;
        rows.rows.insert(id, (weight, value, None));
        id
    }

    pub fn cost_of(&self, id: i64) -> Option<Decimal> {
        self.rows.lock().unwrap().rows.get(&id).and_then(|r| r.2)
    }

    pub fn writes(&self) -> usize {
        self.rows.lock().unwrap().writes
    }

    /// Simulate another run pricing `id` right after it was selected
    pub fn price_on_next_select(&self, id: i64, cost: Decimal) {
        self.rows.lock().unwrap().price_on_select.push((id, cost));
    }
}

#[async_trait]
impl ParcelStore for MemoryParcelStore {
    async fn pending_parcels(&self) -> DeliveryResult<Vec<PendingParcel>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let mut rows = self.rows.lock().unwrap();
        let pending = rows
            .rows
            .iter()
            .filter(|(_, r)| r.2.is_none())
            .map(|(id, r)| PendingParcel {
                id: *id,
                weight: r.0,
                value: r.1,
            })
            .collect();

        for (id, cost) in std::mem::take(&mut rows.price_on_select) {
            if let Some(row) = rows.rows.get_mut(&id) {
                row.2 = Some(cost);
            }
        }

        Ok(pending)
    }

    async fn record_delivery_cost(&self, id: i64, cost: Decimal) -> DeliveryResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let updated = match rows.rows.get_mut(&id) {
            Some(row) if row.2.is_none() => {
                row.2 = Some(cost);
                true
            }
            _ => false,
        };
        if updated {
            rows.writes += 1;
        }
        Ok(updated)
    }
}

/// Rate source returning a settable rate, or always failing
pub struct FixedRateSource {
    rate: Mutex<Option<Decimal>>,
    calls: AtomicUsize,
}

impl FixedRateSource {
    pub fn new(rate: Decimal) -> Self {
        Self {
            rate: Mutex::new(Some(rate)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            rate: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_rate(&self, rate: Decimal) {
        *self.rate.lock().unwrap() = Some(rate);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    async fn fetch_rate(&self) -> DeliveryResult<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate
            .lock()
            .unwrap()
            .ok_or_else(|| DeliveryError::RatePayload("rate source unavailable".to_string()))
    }
}

/// Rate cache over a fresh in-memory store
pub fn memory_rate_cache(source: Arc<FixedRateSource>) -> RateCache {
    let clock = Arc::new(SystemClock);
    RateCache::new(
        Arc::new(MemoryCacheStore::new(clock.clone())),
        source,
        clock,
        DEFAULT_RATE_CACHE_KEY,
        DEFAULT_RATE_TTL,
    )
}
