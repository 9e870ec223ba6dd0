//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait provides a unified async interface over concrete
//! storage engines (in-memory, MongoDB). Documents cross this boundary as BSON
//! values keyed by their string identifier.
//!
//! # Examples
//!
//! ```ignore
//! use clientele_core::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//!
//! let id = backend.generate_id();
//! let doc = Bson::Document(doc! { "id": &id, "firstName": "Alice" });
//! backend.save_documents(vec![(id, doc)], "customer").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and tolerate concurrent calls. No
/// operation is required to be atomic with respect to any other.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Writes documents under their identifiers, replacing any document already
    /// stored under the same identifier.
    ///
    /// The collection is created if it does not exist.
    async fn save_documents(
        &self,
        documents: Vec<(String, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Removes the documents with the given identifiers.
    ///
    /// Identifiers that match nothing, and collections that do not exist, are
    /// not errors.
    async fn delete_documents(&self, ids: Vec<String>, collection: &str) -> DocumentStoreResult<()>;

    /// Fetches the documents with the given identifiers.
    ///
    /// Missing identifiers are skipped, and each stored document is returned at
    /// most once even if its identifier is repeated.
    async fn get_documents(
        &self,
        ids: Vec<String>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Runs a query against a collection. A missing collection yields no documents.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Counts documents matching `filter`, or every document when `filter` is `None`.
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()>;

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()>;

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Creates an index on `field`. Backends without indexing treat this as a no-op.
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()>;

    async fn drop_index(&self, collection: &str, field: &str) -> DocumentStoreResult<()>;

    /// Generates a fresh identifier for a document saved without one.
    ///
    /// The default produces a 24 hex digit ObjectId string.
    fn generate_id(&self) -> String {
        ObjectId::new().to_hex()
    }

    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for asynchronously constructing backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
