use super::{Entity, Resource, UpdateDocument};
use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use service_core::error::AppError;
use validator::{Validate, ValidationErrors};

/// Free-form stock record (`stok`). Fields are stored as sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub fields: Document,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct StockTransactionRequest(pub Map<String, Value>);

impl Validate for StockTransactionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl StockTransactionRequest {
    /// Identifiers are server-owned; a client-sent `id`/`_id` is dropped.
    fn into_document(mut self) -> Result<Document, AppError> {
        self.0.remove("_id");
        self.0.remove("id");
        bson::to_document(&self.0).map_err(|_| AppError::bad_request("Invalid input"))
    }
}

impl Entity for StockTransaction {
    const COLLECTION: &'static str = "stok";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Resource for StockTransaction {
    const NAME: &'static str = "Transaction";
    const KEY: &'static str = "transaction";
    const PLURAL: &'static str = "transactions";

    type Create = StockTransactionRequest;
    type Update = StockTransactionRequest;
    type Response = Map<String, Value>;

    fn from_create(req: StockTransactionRequest, _now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            fields: req.into_document()?,
        })
    }

    /// Records have no fixed allow-list, so the body replaces the whole record.
    fn update_document(req: StockTransactionRequest) -> Result<UpdateDocument, AppError> {
        Ok(UpdateDocument::Replace(req.into_document()?))
    }

    fn into_response(self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("id".to_string(), Value::String(super::id_hex(self.id)));
        if let Value::Object(fields) = Bson::Document(self.fields).into_relaxed_extjson() {
            body.extend(fields);
        }
        body
    }
}
