//! Application state shared across handlers

use common::cache::RedisPool;
use delivery::DeliveryCostScheduler;
use sqlx::PgPool;

use crate::repositories::{ParcelRepository, ParcelTypeRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    /// Present when the rate cache lives in Redis
    pub redis_pool: Option<RedisPool>,
    pub parcel_repository: ParcelRepository,
    pub parcel_type_repository: ParcelTypeRepository,
    pub scheduler: DeliveryCostScheduler,
    pub session_cookie_secure: bool,
}
