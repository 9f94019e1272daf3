//! Direct access to the parcels table for the cost calculator

use async_trait::async_trait;
use common::error::DatabaseError;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::{error::DeliveryResult, models::PendingParcel};

/// Parcel rows as seen by the cost calculator
#[async_trait]
pub trait ParcelStore: Send + Sync {
    /// Every parcel that has no delivery cost yet
    async fn pending_parcels(&self) -> DeliveryResult<Vec<PendingParcel>>;

    /// Write the cost of one parcel
    ///
    /// Returns `false` when the row was already priced, which leaves the
    /// existing cost untouched.
    async fn record_delivery_cost(&self, id: i64, cost: Decimal) -> DeliveryResult<bool>;
}

/// PostgreSQL implementation of [`ParcelStore`]
#[derive(Clone)]
pub struct PgParcelStore {
    pool: PgPool,
}

impl PgParcelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParcelStore for PgParcelStore {
    async fn pending_parcels(&self) -> DeliveryResult<Vec<PendingParcel>> {
        let rows = sqlx::query(
            r#"
            SELECT id, weight, value
            FROM parcels
            WHERE delivery_cost IS NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let parcels = rows
            .into_iter()
            .map(|row| PendingParcel {
                id: row.get("id"),
                weight: row.get("weight"),
                value: row.get("value"),
            })
            .collect();

        Ok(parcels)
    }

    async fn record_delivery_cost(&self, id: i64, cost: Decimal) -> DeliveryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE parcels
            SET delivery_cost = $1
            WHERE id = $2 AND delivery_cost IS NULL
            "#,
        )
        .bind(cost)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
