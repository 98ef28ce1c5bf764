use super::{id_hex, Entity, Resource, UpdateDocument};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
}

/// Create and update body. Missing fields are empty strings.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CustomerRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
}

impl Entity for Customer {
    const COLLECTION: &'static str = "pelanggan";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Resource for Customer {
    const NAME: &'static str = "Customer";
    const KEY: &'static str = "customer";
    const PLURAL: &'static str = "customers";

    type Create = CustomerRequest;
    type Update = CustomerRequest;
    type Response = CustomerResponse;

    fn from_create(req: CustomerRequest, _now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            name: req.name,
            phone: req.phone,
            address: req.address,
            email: req.email,
        })
    }

    fn update_document(req: CustomerRequest) -> Result<UpdateDocument, AppError> {
        Ok(UpdateDocument::Set(doc! {
            "name": req.name,
            "phone": req.phone,
            "address": req.address,
            "email": req.email,
        }))
    }

    fn into_response(self) -> CustomerResponse {
        CustomerResponse {
            id: id_hex(self.id),
            name: self.name,
            phone: self.phone,
            address: self.address,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_writes_every_field_even_when_omitted() {
        let req: CustomerRequest = serde_json::from_str(r#"{"name":"Sari"}"#).unwrap();

        let UpdateDocument::Set(fields) = Customer::update_document(req).unwrap() else {
            panic!("customer update must be a $set");
        };
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.get_str("name").unwrap(), "Sari");
        assert_eq!(fields.get_str("phone").unwrap(), "");
        assert!(!fields.contains_key("_id"));
    }
}
