use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::IndexOptions,
    Client as MongoClient, Database, IndexModel,
};
use service_core::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Upper bound for a single storage round trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Collection-level operations the handlers need from the document database.
///
/// Documents are addressed by their `_id` ObjectId; filters are equality
/// matches on top-level fields.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the storage-assigned identifier.
    async fn insert_one(&self, collection: &str, document: Document)
        -> Result<ObjectId, AppError>;

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError>;

    /// `$set` the given fields. Returns whether a document matched.
    async fn set_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<bool, AppError>;

    /// Replace every field except `_id`. Returns whether a document matched.
    async fn replace_one(
        &self,
        collection: &str,
        id: ObjectId,
        document: Document,
    ) -> Result<bool, AppError>;

    /// Set `field` to `value` only where it is null or absent.
    async fn set_where_null(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), AppError>;

    /// Atomically `$push` a value onto an array field. Returns whether a document matched.
    ///
    /// Fails when the field holds a non-array value, null included.
    async fn push_to_array(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<bool, AppError>;

    /// Returns whether a document was deleted.
    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<bool, AppError>;

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Whether a storage error is a unique-index violation (E11000).
pub fn is_duplicate_key(err: &AppError) -> bool {
    matches!(err, AppError::DatabaseError(e) if e.to_string().contains("E11000"))
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    timeout: Duration,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str, timeout: Duration) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let store = Self {
            client,
            db,
            timeout,
        };
        store.health_check().await?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(store)
    }

    /// Run a driver call under the store timeout; expiry is a storage error.
    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, mongodb::error::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!(operation = %operation, "MongoDB operation failed: {}", e);
                AppError::from(e)
            }),
            Err(_) => {
                tracing::error!(
                    operation = %operation,
                    timeout_secs = self.timeout.as_secs(),
                    "MongoDB operation timed out"
                );
                Err(AppError::DatabaseError(anyhow::anyhow!(
                    "{} timed out after {:?}",
                    operation,
                    self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MongoDb {
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId, AppError> {
        let coll = self.db.collection::<Document>(collection);
        let result = self
            .bounded("insert_one", coll.insert_one(document, None))
            .await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Failed to parse inserted ID"))
        })
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let coll = self.db.collection::<Document>(collection);
        self.bounded("find", async move {
            let cursor = coll.find(filter, None).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        let coll = self.db.collection::<Document>(collection);
        self.bounded("find_one", coll.find_one(filter, None)).await
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<bool, AppError> {
        let coll = self.db.collection::<Document>(collection);
        let result = self
            .bounded(
                "update_one",
                coll.update_one(doc! { "_id": id }, doc! { "$set": fields }, None),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: ObjectId,
        mut document: Document,
    ) -> Result<bool, AppError> {
        document.remove("_id");
        let coll = self.db.collection::<Document>(collection);
        let result = self
            .bounded(
                "replace_one",
                coll.replace_one(doc! { "_id": id }, document, None),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn set_where_null(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), AppError> {
        // `{field: null}` also matches a missing field.
        let mut filter = doc! { "_id": id };
        filter.insert(field, Bson::Null);
        let mut set = Document::new();
        set.insert(field, value);

        let coll = self.db.collection::<Document>(collection);
        self.bounded(
            "set_where_null",
            coll.update_one(filter, doc! { "$set": set }, None),
        )
        .await?;
        Ok(())
    }

    async fn push_to_array(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<bool, AppError> {
        let coll = self.db.collection::<Document>(collection);
        let mut push = Document::new();
        push.insert(field, value);
        let result = self
            .bounded(
                "push",
                coll.update_one(doc! { "_id": id }, doc! { "$push": push }, None),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<bool, AppError> {
        let coll = self.db.collection::<Document>(collection);
        let result = self
            .bounded("delete_one", coll.delete_one(doc! { "_id": id }, None))
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), AppError> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(format!("{}_unique", field))
                    .unique(true)
                    .build(),
            )
            .build();

        let coll = self.db.collection::<Document>(collection);
        self.bounded("create_index", coll.create_index(index, None))
            .await?;
        tracing::info!("Created unique index on {}.{}", collection, field);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        let admin = self.client.database("admin");
        self.bounded("ping", admin.run_command(doc! { "ping": 1 }, None))
            .await?;
        Ok(())
    }
}
