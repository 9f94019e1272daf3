//! Input validation for parcel registration

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{RegisterParcelForm, parcel::NewParcel};

/// Longest accepted parcel name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Heaviest accepted parcel, in kilograms
pub const MAX_WEIGHT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Largest accepted declared value, in USD
pub const MAX_VALUE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Validate parcel name, returning it trimmed
pub fn validate_name(name: &str) -> Result<String, String> {
    let name = name.trim();

    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {} characters long",
            MAX_NAME_LENGTH
        ));
    }

    Ok(name.to_string())
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{} is required", field));
    }

    Decimal::from_str(raw).map_err(|_| format!("{} must be a decimal number", field))
}

/// Validate weight: a decimal greater than zero and at most [`MAX_WEIGHT`]
pub fn validate_weight(raw: &str) -> Result<Decimal, String> {
    let weight = parse_decimal("Weight", raw)?;

    if weight <= Decimal::ZERO {
        return Err("Weight must be greater than 0".to_string());
    }

    if weight > MAX_WEIGHT {
        return Err(format!("Weight must be at most {}", MAX_WEIGHT));
    }

    Ok(weight)
}

/// Validate declared value: a decimal between zero and [`MAX_VALUE`]
pub fn validate_value(raw: &str) -> Result<Decimal, String> {
    let value = parse_decimal("Value", raw)?;

    if value < Decimal::ZERO {
        return Err("Value must be greater than or equal to 0".to_string());
    }

    if value > MAX_VALUE {
        return Err(format!("Value must be at most {}", MAX_VALUE));
    }

    Ok(value)
}

/// Validate parcel type id format; existence is checked against the store
pub fn validate_type_id(raw: &str) -> Result<i32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Type id is required".to_string());
    }

    raw.parse()
        .map_err(|_| "Type id must be an integer".to_string())
}

/// Validate a registration form
pub fn validate_registration(form: &RegisterParcelForm) -> Result<NewParcel, String> {
    Ok(NewParcel {
        name: validate_name(&form.name)?,
        weight: validate_weight(&form.weight)?,
        type_id: validate_type_id(&form.type_id)?,
        value: validate_value(&form.value)?,
    })
}
