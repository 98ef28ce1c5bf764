pub mod auth;
pub mod employee;

pub use auth::*;
pub use employee::*;

use serde::{Deserialize, Serialize};

/// `?id=` on by-id routes. Kept optional so a missing id is a 400 with our message.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierIdQuery {
    pub supplier_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerName {
    pub id: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct ItemTransactionSummary {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
