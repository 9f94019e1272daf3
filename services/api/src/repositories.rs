//! Repositories for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};

use crate::models::ParcelType;

pub mod parcel;

pub use parcel::ParcelRepository;

/// Parcel type repository for the reference table
#[derive(Clone)]
pub struct ParcelTypeRepository {
    pool: PgPool,
}

impl ParcelTypeRepository {
    /// Create a new parcel type repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all parcel types
    pub async fn get_all(&self) -> DatabaseResult<Vec<ParcelType>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name
            FROM parcel_types
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let types = rows
            .into_iter()
            .map(|row| ParcelType {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect();

        Ok(types)
    }

    /// Check whether a parcel type exists
    pub async fn exists(&self, id: i32) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM parcel_types WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(DatabaseError::Query)?;

        Ok(exists)
    }
}
