use super::{id_hex, to_bson_date, Entity, Resource, UpdateDocument};
use crate::utils::display_date;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// A laundry sale (`transaksi`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesTransaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub weight_per_kg: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub payment_method: String,
    pub transaction_date: bson::DateTime,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SalesTransactionRequest {
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,
    pub weight_per_kg: f64,
    pub total_price: f64,
    pub payment_method: String,
    /// Defaults to the server clock when absent.
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Update body. Payment method and date are fixed once the sale is recorded.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SalesTransactionUpdate {
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,
    pub weight_per_kg: f64,
    pub total_price: f64,
}

#[derive(Debug, Serialize)]
pub struct SalesTransactionResponse {
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,
    pub weight_per_kg: f64,
    pub total_price: f64,
    pub payment_method: String,
    pub transaction_date: DateTime<Utc>,
    pub formatted_date: String,
}

impl Entity for SalesTransaction {
    const COLLECTION: &'static str = "transaksi";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Resource for SalesTransaction {
    const NAME: &'static str = "Transaction";
    const KEY: &'static str = "transaction";
    const PLURAL: &'static str = "transactions";

    type Create = SalesTransactionRequest;
    type Update = SalesTransactionUpdate;
    type Response = SalesTransactionResponse;

    fn from_create(req: SalesTransactionRequest, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            customer_name: req.customer_name,
            phone_number: req.phone_number,
            service_type: req.service_type,
            weight_per_kg: req.weight_per_kg,
            total_price: req.total_price,
            payment_method: req.payment_method,
            transaction_date: to_bson_date(req.transaction_date.unwrap_or(now)),
        })
    }

    fn update_document(req: SalesTransactionUpdate) -> Result<UpdateDocument, AppError> {
        Ok(UpdateDocument::Set(doc! {
            "customer_name": req.customer_name,
            "phone_number": req.phone_number,
            "service_type": req.service_type,
            "weight_per_kg": req.weight_per_kg,
            "total_price": req.total_price,
        }))
    }

    fn into_response(self) -> SalesTransactionResponse {
        let transaction_date = self.transaction_date.to_chrono();
        SalesTransactionResponse {
            id: id_hex(self.id),
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            service_type: self.service_type,
            weight_per_kg: self.weight_per_kg,
            total_price: self.total_price,
            payment_method: self.payment_method,
            formatted_date: display_date(&transaction_date),
            transaction_date,
        }
    }
}
