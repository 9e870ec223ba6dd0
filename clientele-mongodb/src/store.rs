use async_trait::async_trait;
use futures::{stream::iter, StreamExt, TryStreamExt};
use bson::{Document, Bson, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, FindOptions, IndexOptions},
};
use tracing::{debug, info};
use clientele_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, QueryVisitor},
};

use crate::{sanitizer::ValueSanitizer, query::MongoQueryTranslator};


/// MongoDB-backed document store.
///
/// Documents are stored with their identifier as `_id`, alongside the document's
/// own fields. Identifiers that are 24 hex digits are stored as ObjectIds, others
/// as strings. On read, `_id` is stripped; a document without its own `id` field
/// gets one restored from `_id`, so collections written by other ObjectId-keyed
/// clients read back with their identifiers.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&ValueSanitizer::sanitize_string(collection_name))
    }

    /// The `_id` value an identifier is stored under.
    fn stored_id(id: &str) -> Bson {
        ObjectId::parse_str(id)
            .map(Bson::ObjectId)
            .unwrap_or_else(|_| Bson::String(id.to_string()))
    }

    /// Every `_id` form an identifier may have been stored under.
    fn id_candidates(ids: &[String]) -> Vec<Bson> {
        ids.iter()
            .flat_map(|id| {
                std::iter::once(Bson::String(id.clone()))
                    .chain(ObjectId::parse_str(id).ok().map(Bson::ObjectId))
            })
            .collect()
    }

    fn prepare_document(id: &str, document: &Bson) -> DocumentStoreResult<Document> {
        Ok(Document::from_iter(
            ValueSanitizer::sanitize_value(document)
                .as_document()
                .cloned()
                .ok_or_else(|| DocumentStoreError::InvalidDocument("Expected document".into()))?
                .into_iter()
                .chain(std::iter::once(("_id".to_string(), Self::stored_id(id)))),
        ))
    }

    fn restore_document(document: &Document) -> Bson {
        let mut restored = document.clone();

        if let Some(stored) = restored.remove("_id") {
            if !restored.contains_key("id") {
                let id = match stored {
                    Bson::ObjectId(oid) => oid.to_hex(),
                    Bson::String(id) => id,
                    other => other.to_string(),
                };
                restored.insert("id", id);
            }
        }

        ValueSanitizer::restore_value(&Bson::Document(restored))
    }

    /// Limit, skip and sort for a query. Sizes beyond the driver's range saturate.
    fn find_options(query: &Query) -> FindOptions {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if let Some(skip) = query.offset {
            options.skip = Some(u64::try_from(skip).unwrap_or(u64::MAX));
        }
        if !query.sort.is_empty() {
            options.sort = Some(MongoQueryTranslator::sort_document(&query.sort));
        }

        options
    }

    fn translate_filter(filter: Option<&Expr>) -> DocumentStoreResult<Document> {
        match filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn save_documents(&self, documents: Vec<(String, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        debug!(collection, count = documents.len(), "saving documents");

        iter(documents)
            .then(async |(id, doc)| self.get_collection(collection)
                .replace_one(
                    doc! { "_id": Self::stored_id(&id) },
                    Self::prepare_document(&id, &doc)?,
                )
                .upsert(true)
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))
            )
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<String>, collection: &str) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .delete_many(doc! { "_id": { "$in": Self::id_candidates(&ids) } })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<String>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        Ok(
            self.get_collection(collection)
                .find(doc! { "_id": { "$in": Self::id_candidates(&ids) } })
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .iter()
                .map(Self::restore_document)
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let options = Self::find_options(&query);

        Ok(
            self.get_collection(collection)
                .find(Self::translate_filter(query.filter.as_ref())?)
                .with_options(options)
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .iter()
                .map(Self::restore_document)
                .collect()
        )
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        self.get_collection(collection)
            .count_documents(Self::translate_filter(filter.as_ref())?)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .create_collection(&ValueSanitizer::sanitize_string(name))
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.get_collection(name)
            .drop()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.client
                .database(&self.database)
                .list_collection_names()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .iter()
                .map(|name| ValueSanitizer::restore_string(name))
                .collect()
        )
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        info!(collection, field, unique, "creating index");

        let key = ValueSanitizer::sanitize_string(field);

        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { key: 1 })
                .options(
                    IndexOptions::builder()
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn drop_index(&self, collection: &str, field: &str) -> DocumentStoreResult<()> {
        // Default MongoDB index name for a single ascending key
        self.get_collection(collection)
            .drop_index(format!("{}_1", ValueSanitizer::sanitize_string(field)))
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

/// Builds a [`MongoDbStore`] from a connection string and database name.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
        )
        .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        info!(database = %self.database, "connected mongodb client");

        Ok(MongoDbStore::new(client, self.database))
    }
}
