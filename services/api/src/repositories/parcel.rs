//! Parcel repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::{
    models::parcel::{NewParcel, Parcel, ParcelFilter},
    session::SessionId,
};

const PARCEL_COLUMNS: &str = "id, parcel_id, name, weight, type_id, value, delivery_cost";

/// Parcel repository for database operations
#[derive(Clone)]
pub struct ParcelRepository {
    pool: PgPool,
}

impl ParcelRepository {
    /// Create a new parcel repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new parcel without a delivery cost, owned by `session`
    pub async fn create(&self, parcel: &NewParcel, session: SessionId) -> DatabaseResult<Parcel> {
        let parcel_id = Uuid::new_v4();
        info!("Registering parcel {} for session {}", parcel_id, session);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO parcels (parcel_id, name, weight, type_id, value, delivery_cost, session_id)
            VALUES ($1, $2, $3, $4, $5, NULL, $6)
            RETURNING {}
            "#,
            PARCEL_COLUMNS
        ))
        .bind(parcel_id)
        .bind(&parcel.name)
        .bind(parcel.weight)
        .bind(parcel.type_id)
        .bind(parcel.value)
        .bind(session.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(parcel_from_row(&row))
    }

    /// Find a parcel by its public id
    pub async fn find_by_parcel_id(&self, parcel_id: Uuid) -> DatabaseResult<Option<Parcel>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM parcels WHERE parcel_id = $1",
            PARCEL_COLUMNS
        ))
        .bind(parcel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(parcel_from_row))
    }

    /// List the parcels of one session with filtering and pagination
    ///
    /// Returns the requested page and the number of parcels matching the
    /// filter across all pages.
    pub async fn list(
        &self,
        session: SessionId,
        filter: &ParcelFilter,
    ) -> DatabaseResult<(Vec<Parcel>, i64)> {
        let rows = list_query(session, filter)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        let total = count_query(session, filter)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok((rows.iter().map(parcel_from_row).collect(), total))
    }
}

fn parcel_from_row(row: &PgRow) -> Parcel {
    Parcel {
        id: row.get("id"),
        parcel_id: row.get("parcel_id"),
        name: row.get("name"),
        weight: row.get("weight"),
        type_id: row.get("type_id"),
        value: row.get("value"),
        delivery_cost: row.get("delivery_cost"),
    }
}

fn push_filters(
    builder: &mut QueryBuilder<'static, Postgres>,
    session: SessionId,
    filter: &ParcelFilter,
) {
    builder
        .push(" WHERE session_id = ")
        .push_bind(session.as_uuid());

    if let Some(type_id) = filter.type_id {
        builder.push(" AND type_id = ").push_bind(type_id);
    }
    match filter.has_delivery_cost {
        Some(true) => {
            builder.push(" AND delivery_cost IS NOT NULL");
        }
        Some(false) => {
            builder.push(" AND delivery_cost IS NULL");
        }
        None => {}
    }
    if let Some(min_weight) = filter.min_weight {
        builder.push(" AND weight >= ").push_bind(min_weight);
    }
    if let Some(max_weight) = filter.max_weight {
        builder.push(" AND weight <= ").push_bind(max_weight);
    }
    if let Some(min_value) = filter.min_value {
        builder.push(" AND value >= ").push_bind(min_value);
    }
    if let Some(max_value) = filter.max_value {
        builder.push(" AND value <= ").push_bind(max_value);
    }
}

fn list_query(session: SessionId, filter: &ParcelFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM parcels", PARCEL_COLUMNS));
    push_filters(&mut builder, session, filter);
    builder
        .push(" ORDER BY id LIMIT ")
        .push_bind(filter.limit())
        .push(" OFFSET ")
        .push_bind(filter.offset());
    builder
}

fn count_query(session: SessionId, filter: &ParcelFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM parcels");
    push_filters(&mut builder, session, filter);
    builder
}
