//! Typed access to a single collection.
//!
//! [`TypedCollection`] converts between a [`Document`] type and the BSON values a
//! backend stores, and assigns generated identifiers on save.
//!
//! ```ignore
//! let customers = store.typed_collection::<Customer>();
//! let saved = customers.save(vec![customer]).await?;
//! assert!(saved[0].id().is_some());
//! ```

use bson::Bson;
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// A type-safe view over one collection of a backend.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Saves documents, replacing any stored under the same identifiers.
    ///
    /// Documents without an identifier get one from the backend first. The
    /// returned documents are exactly what was written.
    pub async fn save(&self, documents: Vec<D>) -> DocumentStoreResult<Vec<D>> {
        let documents = documents
            .into_iter()
            .map(|mut d| {
                if d.id().is_none() {
                    d.set_id(self.backend.generate_id());
                }
                d
            })
            .collect::<Vec<D>>();

        let entries = documents
            .iter()
            .map(|d| {
                d.to_bson()
                    .map(|b| (d.id().unwrap_or_default().to_string(), b))
            })
            .collect::<Result<Vec<(String, Bson)>, _>>()?;

        self.backend
            .save_documents(entries, self.name())
            .await?;

        Ok(documents)
    }

    pub async fn delete<I>(&self, ids: Vec<I>) -> DocumentStoreResult<()>
    where
        I: Into<String> + Send,
    {
        self.backend
            .delete_documents(
                ids.into_iter()
                    .map(Into::into)
                    .collect(),
                self.name(),
            )
            .await
    }

    pub async fn get<I>(&self, ids: Vec<I>) -> DocumentStoreResult<Vec<D>>
    where
        I: Into<String> + Send,
    {
        self.backend
            .get_documents(
                ids.into_iter()
                    .map(Into::into)
                    .collect(),
                self.name(),
            )
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<Result<Vec<D>, _>>()
    }

    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<Result<Vec<D>, _>>()
    }

    pub async fn count(&self, filter: Option<Expr>) -> DocumentStoreResult<u64> {
        self.backend
            .count_documents(filter, self.name())
            .await
    }
}
