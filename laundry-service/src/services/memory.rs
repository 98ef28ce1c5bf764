use super::database::DocumentStore;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local [`DocumentStore`] for tests and local runs without MongoDB.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    unique_fields: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collections(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Document>>>, AppError> {
        self.collections
            .lock()
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("In-memory store poisoned: {}", e)))
    }

    fn unique_fields_for(&self, collection: &str) -> Result<Vec<String>, AppError> {
        let guard = self
            .unique_fields
            .lock()
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("In-memory store poisoned: {}", e)))?;
        Ok(guard.get(collection).cloned().unwrap_or_default())
    }

    /// Number of documents currently held in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    document.get_object_id("_id").map_or(false, |found| &found == id)
}

/// Mirror a unique index: no other document may hold the same value.
fn check_unique(
    collection: &str,
    docs: &[Document],
    unique: &[String],
    candidate: &Document,
) -> Result<(), AppError> {
    let own_id = candidate.get_object_id("_id").ok();
    for field in unique {
        let Some(value) = candidate.get(field) else {
            continue;
        };
        let taken = docs
            .iter()
            .filter(|d| own_id.map_or(true, |id| !has_id(d, &id)))
            .any(|d| d.get(field) == Some(value));
        if taken {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "E11000 duplicate key error collection: {} index: {}_unique",
                collection,
                field
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<ObjectId, AppError> {
        let id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        let unique = self.unique_fields_for(collection)?;
        let mut collections = self.collections()?;
        let docs = collections.entry(collection.to_string()).or_default();

        check_unique(collection, docs, &unique, &document)?;
        docs.push(document);
        Ok(id)
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let collections = self.collections()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.collections()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<bool, AppError> {
        let unique = self.unique_fields_for(collection)?;
        let mut collections = self.collections()?;
        let docs = collections.entry(collection.to_string()).or_default();
        let Some(index) = docs.iter().position(|d| has_id(d, &id)) else {
            return Ok(false);
        };

        let mut updated = docs[index].clone();
        for (key, value) in fields {
            updated.insert(key, value);
        }
        check_unique(collection, docs, &unique, &updated)?;
        docs[index] = updated;
        Ok(true)
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: ObjectId,
        mut document: Document,
    ) -> Result<bool, AppError> {
        let unique = self.unique_fields_for(collection)?;
        let mut collections = self.collections()?;
        let docs = collections.entry(collection.to_string()).or_default();
        let Some(index) = docs.iter().position(|d| has_id(d, &id)) else {
            return Ok(false);
        };

        document.remove("_id");
        let mut replacement = Document::new();
        replacement.insert("_id", id);
        for (key, value) in document {
            replacement.insert(key, value);
        }
        check_unique(collection, docs, &unique, &replacement)?;
        docs[index] = replacement;
        Ok(true)
    }

    async fn set_where_null(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), AppError> {
        let mut collections = self.collections()?;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, &id)));

        if let Some(document) = document {
            if matches!(document.get(field), None | Some(Bson::Null)) {
                document.insert(field, value);
            }
        }
        Ok(())
    }

    async fn push_to_array(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<bool, AppError> {
        let mut collections = self.collections()?;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, &id)))
        else {
            return Ok(false);
        };

        // Same rules as `$push`: a missing field becomes an array, anything else fails.
        match document.get_mut(field) {
            Some(Bson::Array(items)) => items.push(value),
            None => {
                document.insert(field, Bson::Array(vec![value]));
            }
            Some(_) => {
                return Err(AppError::DatabaseError(anyhow::anyhow!(
                    "The field '{}' must be an array",
                    field
                )));
            }
        }
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<bool, AppError> {
        let mut collections = self.collections()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|d| has_id(d, &id)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), AppError> {
        let mut guard = self
            .unique_fields
            .lock()
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("In-memory store poisoned: {}", e)))?;
        let fields = guard.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.collections().map(|_| ())
    }
}
