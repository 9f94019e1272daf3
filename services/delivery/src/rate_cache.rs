//! Exchange rate cache
//!
//! A single keyed entry holds the last fetched rate together with the time it
//! was fetched. The entry expires after a fixed TTL; the next read after
//! expiry goes back to the rate source. Concurrent misses are not
//! deduplicated, so two readers may both hit the network.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use common::cache::RedisPool;
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    error::DeliveryResult,
    models::CachedRate,
    rate_source::RateSource,
};

/// Default cache key for the USD rate
pub const DEFAULT_RATE_CACHE_KEY: &str = "usd_to_local";

/// Default lifetime of a cached rate
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(300);

/// Key/value storage with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the value under `key` if present and not expired
    async fn get(&self, key: &str) -> DeliveryResult<Option<String>>;

    /// Store `value` under `key` for `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> DeliveryResult<()>;
}

/// Cache store backed by Redis, expiry handled by `SETEX`
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: RedisPool,
}

impl RedisCacheStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> DeliveryResult<Option<String>> {
        Ok(self.pool.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> DeliveryResult<()> {
        // SETEX refuses a zero TTL
        let ttl_seconds = ttl.as_secs().max(1);
        self.pool.set(key, value, Some(ttl_seconds)).await?;
        Ok(())
    }
}

struct MemoryEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-process cache store whose expiry follows an injected clock
pub struct MemoryCacheStore {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryCacheStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> DeliveryResult<Option<String>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> DeliveryResult<()> {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.lock().await.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }
}

/// Read-through cache in front of a [`RateSource`]
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn CacheStore>,
    source: Arc<dyn RateSource>,
    clock: Arc<dyn Clock>,
    key: String,
    ttl: Duration,
}

impl RateCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        source: Arc<dyn RateSource>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            source,
            clock,
            key: key.into(),
            ttl,
        }
    }

    /// Return the current rate, fetching it from the source on a miss
    ///
    /// Source failures propagate as-is: there is no retry and no stale value
    /// to fall back to.
    pub async fn get_rate(&self) -> DeliveryResult<Decimal> {
        if let Some(cached) = self.cached().await? {
            debug!(
                "Rate cache hit for {}: {} (fetched at {})",
                self.key, cached.rate, cached.fetched_at
            );
            return Ok(cached.rate);
        }

        info!("Rate cache miss for {}, refreshing", self.key);
        let rate = self.source.fetch_rate().await?;

        let entry = CachedRate {
            rate,
            fetched_at: self.clock.now(),
        };
        let raw = serde_json::to_string(&entry)?;
        self.store.set(&self.key, &raw, self.ttl).await?;

        Ok(rate)
    }

    /// The current cache entry, if any
    pub async fn cached(&self) -> DeliveryResult<Option<CachedRate>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<CachedRate>(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("Ignoring undecodable rate cache entry {}: {}", self.key, e);
                Ok(None)
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
