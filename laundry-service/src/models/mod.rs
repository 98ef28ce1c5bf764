mod customer;
mod item;
mod item_transaction;
mod sales_transaction;
mod stock_transaction;
mod supplier;
mod user;

pub use customer::{Customer, CustomerRequest, CustomerResponse};
pub use item::{Item, ItemRequest, ItemResponse};
pub use item_transaction::{
    ItemTransaction, ItemTransactionRequest, ItemTransactionResponse, ItemTransactionUpdate,
    TransactionType,
};
pub use sales_transaction::{
    SalesTransaction, SalesTransactionRequest, SalesTransactionResponse, SalesTransactionUpdate,
};
pub use stock_transaction::{StockTransaction, StockTransactionRequest};
pub use supplier::{
    AddSupplierTransactionRequest, PurchasedItem, Supplier, SupplierRequest, SupplierResponse,
    SupplierTransaction, SupplierTransactionResponse,
};
pub use user::{Role, User, UserResponse};

use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// A document persisted in its own collection, keyed by `_id`.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);
}

/// An entity served by the generic create/list/get/update/delete handlers.
pub trait Resource: Entity {
    /// Display name used in messages, e.g. `"Customer"`.
    const NAME: &'static str;
    /// Key holding the created entity in the create response.
    const KEY: &'static str;
    /// Used in the empty-list message.
    const PLURAL: &'static str;

    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;
    type Response: Serialize + Send;

    /// Build a new entity, stamping any server-owned fields.
    fn from_create(req: Self::Create, now: DateTime<Utc>) -> Result<Self, AppError>;

    /// What an update writes. Fields of the allow-list missing from the body
    /// are written as their empty value.
    fn update_document(req: Self::Update) -> Result<UpdateDocument, AppError>;

    fn into_response(self) -> Self::Response;
}

pub(crate) fn id_hex(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}

pub(crate) fn to_bson_date(date: DateTime<Utc>) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_chrono(date)
}

/// How an update reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateDocument {
    /// `$set` of the whole allow-list.
    Set(Document),
    /// Replace every field except `_id`.
    Replace(Document),
}
