//! In-memory storage implementation.
//!
//! Documents are kept as BSON values in per-collection ordered maps behind
//! async-safe read-write locks.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Bson;

use clientele_core::{
    query::{Expr, Query},
    error::{DocumentStoreError, DocumentStoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::{DocumentEvaluator, compare_documents};

type CollectionMap = BTreeMap<String, Bson>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and shares its state through an `Arc`, so clones
/// see the same data. Documents within a collection are kept ordered by
/// identifier, which makes unsorted listings and pages deterministic.
///
/// Queries scan the whole collection; indexes are accepted and ignored.
///
/// # Example
///
/// ```ignore
/// use clientele_memory::InMemoryStore;
/// use clientele_core::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// let store = InMemoryStore::new();
/// let doc = Bson::Document(doc! { "id": "c-1", "firstName": "Alice" });
/// store.save_documents(vec![("c-1".to_string(), doc)], "customer").await?;
///
/// let docs = store.get_documents(vec!["c-1".to_string()], "customer").await?;
/// assert_eq!(docs.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn filtered<'a>(collection_map: &'a CollectionMap, filter: Option<&Expr>) -> Vec<&'a Bson> {
        match filter {
            Some(filter) => DocumentEvaluator::filter_documents(collection_map.values(), filter),
            None => collection_map.values().collect(),
        }
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn save_documents(&self, documents: Vec<(String, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        if documents.iter().any(|(_, doc)| doc.as_document().is_none()) {
            return Err(DocumentStoreError::InvalidDocument("Expected document".to_string()));
        }

        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            collection_map.insert(id, doc);
        }

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<String>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;

        if let Some(collection_map) = store.get_mut(collection) {
            for id in ids {
                collection_map.remove(&id);
            }
        }

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<String>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut seen = HashSet::with_capacity(ids.len());
        let mut documents = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(doc) = collection_map.get(&id) {
                if seen.insert(id) {
                    documents.push(doc.clone());
                }
            }
        }

        Ok(documents)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = Self::filtered(collection_map, query.filter.as_ref());

        if !query.sort.is_empty() {
            documents.sort_by(|a, b| compare_documents(&query.sort, a, b));
        }

        Ok(
            documents
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        )
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .map(|collection_map| Self::filtered(collection_map, filter.as_ref()).len() as u64)
                .unwrap_or(0)
        )
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_default();

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;

        if store.remove(name).is_none() {
            return Err(DocumentStoreError::CollectionNotFound(name.to_string()));
        }

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names = self.store
            .read()
            .await
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    async fn add_index(&self, _collection: &str, _field: &str, _unique: bool) -> DocumentStoreResult<()> {
        // No indexing in memory
        Ok(())
    }

    async fn drop_index(&self, _collection: &str, _field: &str) -> DocumentStoreResult<()> {
        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use clientele_core::{
        document::Document,
        query::{Filter, Sort},
        store::DocumentStore,
    };
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Person {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        rank: i32,
    }

    impl Person {
        fn new(name: &str, rank: i32) -> Self {
            Self { id: None, name: name.to_string(), rank }
        }
    }

    impl Document for Person {
        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn set_id(&mut self, id: String) {
            self.id = Some(id);
        }

        fn collection_name() -> &'static str {
            "people"
        }
    }

    fn entry(id: &str, name: &str) -> (String, Bson) {
        (id.to_string(), Bson::Document(doc! { "id": id, "name": name }))
    }

    #[tokio::test]
    async fn save_replaces_existing_document() {
        let store = InMemoryStore::new();
        store.save_documents(vec![entry("a", "first")], "people").await.unwrap();
        store.save_documents(vec![entry("a", "second")], "people").await.unwrap();

        let docs = store.get_documents(vec!["a".to_string()], "people").await.unwrap();

        assert_eq!(docs, vec![Bson::Document(doc! { "id": "a", "name": "second" })]);
    }

    #[tokio::test]
    async fn save_rejects_non_documents() {
        let store = InMemoryStore::new();

        let result = store
            .save_documents(vec![("a".to_string(), Bson::Int32(1))], "people")
            .await;

        assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn delete_ignores_missing_ids_and_collections() {
        let store = InMemoryStore::new();
        store.save_documents(vec![entry("a", "x")], "people").await.unwrap();

        store.delete_documents(vec!["a".to_string(), "b".to_string()], "people").await.unwrap();
        store.delete_documents(vec!["a".to_string()], "nowhere").await.unwrap();

        assert_eq!(store.count_documents(None, "people").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_skips_missing_and_repeated_ids() {
        let store = InMemoryStore::new();
        store.save_documents(vec![entry("a", "x"), entry("b", "y")], "people").await.unwrap();

        let docs = store
            .get_documents(
                vec!["b".to_string(), "zz".to_string(), "b".to_string(), "a".to_string()],
                "people",
            )
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].as_document().unwrap().get_str("id").unwrap(), "b");
    }

    #[tokio::test]
    async fn query_filters_sorts_and_pages() {
        let store = InMemoryStore::new();
        store
            .save_documents(
                vec![
                    (
                        "1".to_string(),
                        Bson::Document(doc! { "id": "1", "group": "x", "rank": 3 }),
                    ),
                    (
                        "2".to_string(),
                        Bson::Document(doc! { "id": "2", "group": "x", "rank": 1 }),
                    ),
                    (
                        "3".to_string(),
                        Bson::Document(doc! { "id": "3", "group": "y", "rank": 2 }),
                    ),
                    (
                        "4".to_string(),
                        Bson::Document(doc! { "id": "4", "group": "x", "rank": 2 }),
                    ),
                ],
                "people",
            )
            .await
            .unwrap();

        let docs = store
            .query_documents(
                Query::builder()
                    .filter(Filter::eq("group", "x"))
                    .sort(Sort::desc("rank"))
                    .offset(1)
                    .limit(5)
                    .build(),
                "people",
            )
            .await
            .unwrap();

        let ids = docs
            .iter()
            .map(|d| d.as_document().unwrap().get_str("id").unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(ids, vec!["4", "2"]);
        assert_eq!(
            store.count_documents(Some(Filter::eq("group", "x")), "people").await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let store = InMemoryStore::new();

        assert!(store.query_documents(Query::new(), "people").await.unwrap().is_empty());
        assert!(store.get_documents(vec!["a".to_string()], "people").await.unwrap().is_empty());
        assert_eq!(store.count_documents(None, "people").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn collections_can_be_created_listed_and_dropped() {
        let store = InMemoryStoreBuilder.build().await.unwrap();
        store.create_collection("b").await.unwrap();
        store.create_collection("a").await.unwrap();

        assert_eq!(store.list_collections().await.unwrap(), vec!["a", "b"]);

        store.drop_collection("a").await.unwrap();

        assert!(matches!(
            store.drop_collection("a").await,
            Err(DocumentStoreError::CollectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn typed_collection_assigns_generated_ids() {
        let store = DocumentStore::new(InMemoryStore::new());
        let people = store.typed_collection::<Person>();

        let saved = people
            .save(vec![Person::new("Ann", 1), Person::new("Bob", 2)])
            .await
            .unwrap();

        let first = saved[0].id().unwrap().to_string();
        let second = saved[1].id().unwrap().to_string();

        assert_eq!(first.len(), 24);
        assert_ne!(first, second);
        assert_eq!(people.get(vec![first.clone()]).await.unwrap(), vec![saved[0].clone()]);

        people.delete(vec![first]).await.unwrap();

        assert_eq!(people.count(None).await.unwrap(), 1);
        assert_eq!(
            people
                .query(Query::builder().filter(Filter::eq("name", "Bob")).build())
                .await
                .unwrap(),
            vec![saved[1].clone()]
        );
    }

    #[tokio::test]
    async fn typed_collection_keeps_caller_ids() {
        let store = DocumentStore::new(InMemoryStore::new());
        let people = store.typed_collection::<Person>();

        let mut person = Person::new("Ann", 1);
        person.set_id("chosen".to_string());
        people.save(vec![person]).await.unwrap();

        let mut replacement = Person::new("Ann", 7);
        replacement.set_id("chosen".to_string());
        people.save(vec![replacement.clone()]).await.unwrap();

        assert_eq!(people.get(vec!["chosen"]).await.unwrap(), vec![replacement]);
        store.add_index("people", "name", false).await.unwrap();
        store.drop_index("people", "name").await.unwrap();
        store.shutdown().await.unwrap();
    }
}
