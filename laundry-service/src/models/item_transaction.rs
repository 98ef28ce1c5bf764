use super::{id_hex, to_bson_date, Entity, Resource, UpdateDocument};
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Usage,
    Purchase,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Usage => "usage",
            TransactionType::Purchase => "purchase",
        }
    }
}

impl From<TransactionType> for Bson {
    fn from(value: TransactionType) -> Self {
        Bson::String(value.as_str().to_string())
    }
}

/// Stock movement of one inventory item (`item_transaksi`).
///
/// `stock_after` is reported by the client; the server does not recompute it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTransaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_name: String,
    pub date: bson::DateTime,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub stock_after: i64,
}

/// Create body. A client-sent `date` is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct ItemTransactionRequest {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_name: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub stock_after: i64,
}

/// Update body. `date` and `transaction_type` have no empty value and must be sent.
#[derive(Debug, Deserialize)]
pub struct ItemTransactionUpdate {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_name: String,
    pub date: DateTime<Utc>,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub stock_after: i64,
}

#[derive(Debug, Serialize)]
pub struct ItemTransactionResponse {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub date: DateTime<Utc>,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub stock_after: i64,
}

impl Entity for ItemTransaction {
    const COLLECTION: &'static str = "item_transaksi";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Resource for ItemTransaction {
    const NAME: &'static str = "Transaction";
    const KEY: &'static str = "transaction";
    const PLURAL: &'static str = "transactions";

    type Create = ItemTransactionRequest;
    type Update = ItemTransactionUpdate;
    type Response = ItemTransactionResponse;

    fn from_create(req: ItemTransactionRequest, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            item_id: req.item_id,
            item_name: req.item_name,
            date: to_bson_date(now),
            transaction_type: req.transaction_type,
            quantity: req.quantity,
            stock_after: req.stock_after,
        })
    }

    fn update_document(req: ItemTransactionUpdate) -> Result<UpdateDocument, AppError> {
        Ok(UpdateDocument::Set(doc! {
            "item_id": req.item_id,
            "item_name": req.item_name,
            "date": to_bson_date(req.date),
            "transaction_type": Bson::from(req.transaction_type),
            "quantity": req.quantity,
            "stock_after": req.stock_after,
        }))
    }

    fn into_response(self) -> ItemTransactionResponse {
        ItemTransactionResponse {
            id: id_hex(self.id),
            item_id: self.item_id,
            item_name: self.item_name,
            date: self.date.to_chrono(),
            transaction_type: self.transaction_type,
            quantity: self.quantity,
            stock_after: self.stock_after,
        }
    }
}
