use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod schema;
mod session;
mod state;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool},
};
use delivery::{
    CostCalculator, DeliveryCostScheduler, RateCache,
    clock::{Clock, SystemClock},
    rate_cache::{CacheStore, MemoryCacheStore, RedisCacheStore},
    rate_source::HttpRateSource,
    store::PgParcelStore,
};
use tokio::net::TcpListener;

use crate::{
    config::{RateCacheBackend, ServiceConfig},
    repositories::{ParcelRepository, ParcelTypeRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting parcel API service");

    let config = ServiceConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    schema::bootstrap(&pool).await?;

    // Rate cache backend
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (cache_store, redis_pool) = match config.rate_cache_backend {
        RateCacheBackend::Redis => {
            let redis_pool = RedisPool::new(&RedisConfig::from_env())?;
            if !redis_pool.health_check().await? {
                anyhow::bail!("Failed to connect to Redis");
            }
            info!("Redis connection successful");
            let store: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(redis_pool.clone()));
            (store, Some(redis_pool))
        }
        RateCacheBackend::Memory => {
            info!("Using in-process rate cache");
            let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new(clock.clone()));
            (store, None)
        }
    };

    let rate_source = HttpRateSource::new(&config.rate_source_url, config.rate_fetch_timeout())?;
    info!("Fetching exchange rates from {}", rate_source.url());
    let rates = RateCache::new(
        cache_store,
        Arc::new(rate_source),
        clock,
        &config.rate_cache_key,
        config.rate_cache_ttl(),
    );
    info!(
        "Caching the exchange rate under '{}' for {:?}",
        rates.key(),
        rates.ttl()
    );

    let calculator = CostCalculator::new(Arc::new(PgParcelStore::new(pool.clone())), rates);
    let scheduler = DeliveryCostScheduler::new(calculator);

    if config.scheduler_enabled {
        scheduler.start(&config.calculation_schedule).await?;
    } else {
        info!("Periodic delivery cost calculation disabled");
    }

    let app_state = AppState {
        db_pool: pool.clone(),
        redis_pool,
        parcel_repository: ParcelRepository::new(pool.clone()),
        parcel_type_repository: ParcelTypeRepository::new(pool),
        scheduler: scheduler.clone(),
        session_cookie_secure: config.session_cookie_secure,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Parcel API service listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await?;
    info!("Parcel API service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
