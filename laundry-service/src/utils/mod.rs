pub mod password;
pub mod validation;

pub use password::{hash_password, verify_credentials, Password, PasswordHashString};
pub use validation::{decode_json, JsonBody, ValidatedJson};

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Display format used by the point-of-sale frontend (dd/mm/yyyy).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn display_date(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parse an identifier taken from the query string.
pub fn parse_object_id(raw: Option<&str>) -> Result<ObjectId, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("ID not provided"))?;

    ObjectId::parse_str(raw).map_err(|_| AppError::bad_request("Invalid ID"))
}
