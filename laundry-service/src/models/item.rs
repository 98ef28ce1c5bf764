use super::{id_hex, Entity, Resource, UpdateDocument};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// Inventory item (`barang`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ItemRequest {
    pub item_name: String,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub item_name: String,
    pub quantity: i64,
    pub price: f64,
}

impl Entity for Item {
    const COLLECTION: &'static str = "barang";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Resource for Item {
    const NAME: &'static str = "Item";
    const KEY: &'static str = "item";
    const PLURAL: &'static str = "items";

    type Create = ItemRequest;
    type Update = ItemRequest;
    type Response = ItemResponse;

    fn from_create(req: ItemRequest, _now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            item_name: req.item_name,
            quantity: req.quantity,
            price: req.price,
        })
    }

    fn update_document(req: ItemRequest) -> Result<UpdateDocument, AppError> {
        Ok(UpdateDocument::Set(doc! {
            "item_name": req.item_name,
            "quantity": req.quantity,
            "price": req.price,
        }))
    }

    fn into_response(self) -> ItemResponse {
        ItemResponse {
            id: id_hex(self.id),
            item_name: self.item_name,
            quantity: self.quantity,
            price: self.price,
        }
    }
}
