//! Service configuration loaded from `PARCEL_*` environment variables

use config::{Config, ConfigError, Environment};
use delivery::{
    rate_cache::{DEFAULT_RATE_CACHE_KEY, DEFAULT_RATE_TTL},
    rate_source::DEFAULT_RATE_SOURCE_URL,
    scheduler::EVERY_MINUTE,
};
use serde::Deserialize;
use std::time::Duration;

/// Where the exchange rate cache entry lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateCacheBackend {
    Redis,
    Memory,
}

/// Settings for the HTTP server and the delivery cost job
///
/// Database and Redis connections are configured separately through
/// `DATABASE_*` and `REDIS_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,
    /// Whether this process runs the periodic calculation
    pub scheduler_enabled: bool,
    /// Cron expression (with seconds) for the periodic calculation
    pub calculation_schedule: String,
    /// Endpoint serving the daily rates document
    pub rate_source_url: String,
    pub rate_cache_key: String,
    pub rate_cache_ttl_secs: u64,
    pub rate_cache_backend: RateCacheBackend,
    /// Timeout for the outbound rate request; transport default when unset
    #[serde(default)]
    pub rate_fetch_timeout_secs: Option<u64>,
    /// Mark the session cookie `Secure`
    pub session_cookie_secure: bool,
}

impl ServiceConfig {
    /// Load configuration from the environment
    ///
    /// # Environment Variables
    /// - `PARCEL_BIND_ADDR` (default: "0.0.0.0:8000")
    /// - `PARCEL_SCHEDULER_ENABLED` (default: true)
    /// - `PARCEL_CALCULATION_SCHEDULE` (default: every minute)
    /// - `PARCEL_RATE_SOURCE_URL` (default: the public daily rates document)
    /// - `PARCEL_RATE_CACHE_KEY` (default: "usd_to_local")
    /// - `PARCEL_RATE_CACHE_TTL_SECS` (default: 300)
    /// - `PARCEL_RATE_CACHE_BACKEND`: "redis" or "memory" (default: "redis")
    /// - `PARCEL_RATE_FETCH_TIMEOUT_SECS` (default: unset)
    /// - `PARCEL_SESSION_COOKIE_SECURE` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:8000")?
            .set_default("scheduler_enabled", true)?
            .set_default("calculation_schedule", EVERY_MINUTE)?
            .set_default("rate_source_url", DEFAULT_RATE_SOURCE_URL)?
            .set_default("rate_cache_key", DEFAULT_RATE_CACHE_KEY)?
            .set_default("rate_cache_ttl_secs", DEFAULT_RATE_TTL.as_secs() as i64)?
            .set_default("rate_cache_backend", "redis")?
            .set_default("session_cookie_secure", false)?
            .add_source(Environment::with_prefix("PARCEL").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn rate_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.rate_cache_ttl_secs)
    }

    pub fn rate_fetch_timeout(&self) -> Option<Duration> {
        self.rate_fetch_timeout_secs.map(Duration::from_secs)
    }
}
