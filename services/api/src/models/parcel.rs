//! Parcel models for the API service

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Placeholder shown instead of a delivery cost that is not computed yet
pub const NOT_CALCULATED: &str = "Not calculated";

/// Largest page a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parcel as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parcel {
    pub id: i64,
    pub parcel_id: Uuid,
    pub name: String,
    pub weight: Decimal,
    pub type_id: i32,
    pub value: Decimal,
    #[serde(serialize_with = "serialize_delivery_cost")]
    pub delivery_cost: Option<Decimal>,
}

fn serialize_delivery_cost<S>(cost: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match cost {
        Some(cost) => Serialize::serialize(cost, serializer),
        None => serializer.serialize_str(NOT_CALCULATED),
    }
}

/// Validated registration data
#[derive(Debug, Clone, PartialEq)]
pub struct NewParcel {
    pub name: String,
    pub weight: Decimal,
    pub type_id: i32,
    pub value: Decimal,
}

/// Query parameters for parcel listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParcelQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub page_size: Option<u32>,
    /// Filter by parcel type
    pub type_id: Option<i32>,
    /// Only priced (`true`) or only pending (`false`) parcels
    pub has_delivery_cost: Option<bool>,
    pub min_weight: Option<Decimal>,
    pub max_weight: Option<Decimal>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
}

/// Listing filter with pagination normalised
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelFilter {
    pub page: u32,
    pub page_size: u32,
    pub type_id: Option<i32>,
    pub has_delivery_cost: Option<bool>,
    pub min_weight: Option<Decimal>,
    pub max_weight: Option<Decimal>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
}

impl ParcelFilter {
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl From<ParcelQuery> for ParcelFilter {
    fn from(query: ParcelQuery) -> Self {
        Self {
            page: query.page.unwrap_or(1).max(1),
            page_size: query
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            type_id: query.type_id,
            has_delivery_cost: query.has_delivery_cost,
            min_weight: query.min_weight,
            max_weight: query.max_weight,
            min_value: query.min_value,
            max_value: query.max_value,
        }
    }
}

/// Response for parcel listing with pagination
#[derive(Debug, Clone, Serialize)]
pub struct ParcelListResponse {
    pub items: Vec<Parcel>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}
