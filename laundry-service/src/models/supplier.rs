use super::{id_hex, to_bson_date, Entity, Resource, UpdateDocument};
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub supplied_products: Vec<String>,
    /// Null in legacy documents; read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<SupplierTransaction>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SupplierTransaction>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SupplierTransaction>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A purchase recorded against a supplier. Only created by the append operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierTransaction {
    pub transaction_id: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub payment_method: String,
    pub date: bson::DateTime,
    #[serde(default)]
    pub items_purchased: Vec<PurchasedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PurchasedItem {
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total_price: f64,
}

/// Body of `POST /supplier/transaction`. Identifier and date are server-assigned.
#[derive(Debug, Deserialize)]
pub struct AddSupplierTransactionRequest {
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub items_purchased: Vec<PurchasedItem>,
}

impl AddSupplierTransactionRequest {
    pub fn into_transaction(self, now: DateTime<Utc>) -> SupplierTransaction {
        SupplierTransaction {
            transaction_id: ObjectId::new().to_hex(),
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            date: to_bson_date(now),
            items_purchased: self.items_purchased,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SupplierRequest {
    pub supplier_name: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    pub supplied_products: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SupplierTransactionResponse {
    pub transaction_id: String,
    pub total_amount: f64,
    pub payment_method: String,
    pub date: DateTime<Utc>,
    pub items_purchased: Vec<PurchasedItem>,
}

#[derive(Debug, Serialize)]
pub struct SupplierResponse {
    pub id: String,
    pub supplier_name: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    pub supplied_products: Vec<String>,
    pub transactions: Vec<SupplierTransactionResponse>,
}

impl Entity for Supplier {
    const COLLECTION: &'static str = "supplier";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Resource for Supplier {
    const NAME: &'static str = "Supplier";
    const KEY: &'static str = "supplier";
    const PLURAL: &'static str = "suppliers";

    type Create = SupplierRequest;
    type Update = SupplierRequest;
    type Response = SupplierResponse;

    fn from_create(req: SupplierRequest, _now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            supplier_name: req.supplier_name,
            phone_number: req.phone_number,
            address: req.address,
            email: req.email,
            supplied_products: req.supplied_products,
            transactions: Vec::new(),
        })
    }

    /// `transactions` is not in the allow-list; it only grows through the append operation.
    fn update_document(req: SupplierRequest) -> Result<UpdateDocument, AppError> {
        Ok(UpdateDocument::Set(doc! {
            "supplier_name": req.supplier_name,
            "phone_number": req.phone_number,
            "address": req.address,
            "email": req.email,
            "supplied_products": req.supplied_products,
        }))
    }

    fn into_response(self) -> SupplierResponse {
        SupplierResponse {
            id: id_hex(self.id),
            supplier_name: self.supplier_name,
            phone_number: self.phone_number,
            address: self.address,
            email: self.email,
            supplied_products: self.supplied_products,
            transactions: self
                .transactions
                .into_iter()
                .map(|t| SupplierTransactionResponse {
                    transaction_id: t.transaction_id,
                    total_amount: t.total_amount,
                    payment_method: t.payment_method,
                    date: t.date.to_chrono(),
                    items_purchased: t.items_purchased,
                })
                .collect(),
        }
    }
}
