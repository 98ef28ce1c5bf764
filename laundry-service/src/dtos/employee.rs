use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

/// Fields an admin may change on an employee. Password is not among them.
///
/// Every field is written; omitted ones become empty, and `salary_date` null.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub salary_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeName {
    pub id: String,
    pub name: String,
}
