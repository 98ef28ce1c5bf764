use super::database::DocumentStore;
use crate::models::{Entity, UpdateDocument};
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use serde::Serialize;
use service_core::error::AppError;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed access to one entity's collection.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Persist `entity` and write the assigned identifier back into it.
    pub async fn insert(&self, entity: &mut T) -> Result<ObjectId, AppError> {
        let document = bson::to_document(entity)?;
        let id = self.store.insert_one(T::COLLECTION, document).await?;
        entity.set_id(id);
        Ok(id)
    }

    pub async fn find_all(&self) -> Result<Vec<T>, AppError> {
        self.find(doc! {}).await
    }

    pub async fn find(&self, filter: Document) -> Result<Vec<T>, AppError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|document| bson::from_document(document).map_err(AppError::from))
            .collect()
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>, AppError> {
        self.find_one(doc! { "_id": id }).await
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, AppError> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(bson::from_document)
            .transpose()
            .map_err(AppError::from)
    }

    pub async fn exists(&self, filter: Document) -> Result<bool, AppError> {
        Ok(self.store.find_one(T::COLLECTION, filter).await?.is_some())
    }

    /// Returns `false` when no document has this id.
    pub async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool, AppError> {
        self.store.set_fields(T::COLLECTION, id, fields).await
    }

    /// Write an update built by the entity. Returns `false` when no document has this id.
    pub async fn apply(&self, id: ObjectId, update: UpdateDocument) -> Result<bool, AppError> {
        match update {
            UpdateDocument::Set(fields) => self.store.set_fields(T::COLLECTION, id, fields).await,
            UpdateDocument::Replace(document) => {
                self.store.replace_one(T::COLLECTION, id, document).await
            }
        }
    }

    /// Append `value` to the array `field`. Returns `false` when no document has this id.
    ///
    /// A null `field`, as left by older records, is turned into an empty array first.
    pub async fn push<V: Serialize>(
        &self,
        id: ObjectId,
        field: &str,
        value: &V,
    ) -> Result<bool, AppError> {
        let value = bson::to_bson(value)?;
        self.store
            .set_where_null(T::COLLECTION, id, field, Bson::Array(Vec::new()))
            .await?;
        self.store
            .push_to_array(T::COLLECTION, id, field, value)
            .await
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        self.store.delete_one(T::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Customer;
    use crate::services::InMemoryStore;

    fn customer(name: &str) -> Customer {
        Customer {
            id: None,
            name: name.to_string(),
            phone: "0812".to_string(),
            address: "Bandung".to_string(),
            email: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_sets_id_and_round_trips() {
        let repo = Repository::<Customer>::new(Arc::new(InMemoryStore::new()));
        let mut budi = customer("Budi");

        let id = repo.insert(&mut budi).await.unwrap();
        assert_eq!(budi.id, Some(id));

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Budi");
        assert!(repo.find_by_id(ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn apply_sets_or_replaces() {
        let repo = Repository::<Customer>::new(Arc::new(InMemoryStore::new()));
        let id = repo.insert(&mut customer("Budi")).await.unwrap();

        assert!(repo
            .apply(id, UpdateDocument::Set(doc! { "phone": "0899" }))
            .await
            .unwrap());
        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.phone, "0899");
        assert_eq!(found.address, "Bandung");

        assert!(repo
            .apply(id, UpdateDocument::Replace(doc! { "name": "Sari" }))
            .await
            .unwrap());
        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.name, "Sari");
        assert_eq!(found.address, "");

        assert!(!repo
            .apply(ObjectId::new(), UpdateDocument::Set(doc! { "phone": "0" }))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn find_filters_on_fields() {
        let repo = Repository::<Customer>::new(Arc::new(InMemoryStore::new()));
        repo.insert(&mut customer("Budi")).await.unwrap();
        repo.insert(&mut customer("Sari")).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap().len(), 2);
        assert!(repo.exists(doc! { "name": "Sari" }).await.unwrap());
        assert!(!repo.exists(doc! { "name": "Andi" }).await.unwrap());
    }
}
