//! Schema creation and reference data seeding at startup

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

/// Parcel types inserted into an empty reference table
pub const DEFAULT_PARCEL_TYPES: [(i32, &str); 3] =
    [(1, "Clothes"), (2, "Electronics"), (3, "Others")];

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS parcel_types (
        id INTEGER PRIMARY KEY,
        name VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parcels (
        id BIGSERIAL PRIMARY KEY,
        parcel_id UUID NOT NULL UNIQUE,
        name VARCHAR(100) NOT NULL,
        weight NUMERIC NOT NULL CHECK (weight > 0),
        type_id INTEGER NOT NULL REFERENCES parcel_types (id),
        value NUMERIC NOT NULL CHECK (value >= 0),
        delivery_cost NUMERIC,
        session_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    // tables created with a bounded cost column are widened in place
    "ALTER TABLE parcels ALTER COLUMN delivery_cost TYPE NUMERIC",
    "CREATE INDEX IF NOT EXISTS parcels_session_id_idx ON parcels (session_id)",
    "CREATE INDEX IF NOT EXISTS parcels_pending_idx ON parcels (id) WHERE delivery_cost IS NULL",
];

/// Create the tables if absent and seed the parcel types if empty
pub async fn bootstrap(pool: &PgPool) -> DatabaseResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }

    seed_parcel_types(pool).await?;

    info!("Database schema ready");
    Ok(())
}

async fn seed_parcel_types(pool: &PgPool) -> DatabaseResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parcel_types")
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::Query)?;

    if count > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await.map_err(DatabaseError::Query)?;
    for (id, name) in DEFAULT_PARCEL_TYPES {
        sqlx::query("INSERT INTO parcel_types (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }
    tx.commit().await.map_err(DatabaseError::Query)?;

    info!("Seeded {} parcel types", DEFAULT_PARCEL_TYPES.len());
    Ok(())
}
