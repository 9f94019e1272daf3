//! API models for request and response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionId;

pub mod parcel;

/// Parcel category reference row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelType {
    pub id: i32,
    pub name: String,
}

/// Form submitted to register a parcel
///
/// Fields arrive as raw text so that missing or malformed values produce
/// the same descriptive validation errors as out-of-range ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterParcelForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub type_id: String,
    #[serde(default)]
    pub value: String,
}

/// Response for parcel registration
#[derive(Debug, Serialize)]
pub struct RegisterParcelResponse {
    pub message: String,
    pub parcel_id: Uuid,
    pub session_id: SessionId,
}
