//! The store operations the customer service relies on.
//!
//! [`CustomerRepository`] is the seam between the service and storage. The
//! service only ever talks to this trait; [`DocumentCustomerRepository`] is the
//! implementation over a clientele [`DocumentStore`], and tests substitute their
//! own doubles.

use async_trait::async_trait;
use tracing::{debug, info};

use clientele_core::{
    backend::StoreBackend,
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    page::{Page, PageRequest},
    query::{Filter, Query},
    store::DocumentStore,
};

use crate::customer::{Customer, CustomerField};

/// Customer persistence operations.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Writes a customer. A customer with an identifier replaces the record stored
    /// under it; one without gets a generated identifier. Returns the stored record.
    async fn save(&self, customer: Customer) -> DocumentStoreResult<Customer>;

    /// Customers whose `field` equals `value` exactly.
    async fn find_by_field(&self, field: CustomerField, value: &str) -> DocumentStoreResult<Vec<Customer>>;

    /// Customers stored under `id`.
    async fn find_by_id(&self, id: &str) -> DocumentStoreResult<Vec<Customer>>;

    /// Customers stored under any of `ids`. Unknown ids are skipped.
    async fn find_all_by_id_in(&self, ids: &[String]) -> DocumentStoreResult<Vec<Customer>>;

    async fn find_all(&self) -> DocumentStoreResult<Vec<Customer>>;

    /// One page of all customers, in the order the request specifies.
    async fn find_page(&self, request: PageRequest) -> DocumentStoreResult<Page<Customer>>;

    /// Removes the customer stored under `id`, if any.
    async fn delete_by_id(&self, id: &str) -> DocumentStoreResult<()>;

    /// Removes `customer`, matched by identifier.
    async fn delete(&self, customer: &Customer) -> DocumentStoreResult<()>;

    async fn delete_all(&self, customers: Vec<Customer>) -> DocumentStoreResult<()>;

    /// Number of customers whose `field` equals `value` exactly.
    async fn count_by(&self, field: CustomerField, value: &str) -> DocumentStoreResult<u64>;
}

/// [`CustomerRepository`] over a clientele document store.
///
/// ```ignore
/// use clientele::{memory::InMemoryStore, repository::DocumentCustomerRepository};
/// use clientele_core::store::DocumentStore;
///
/// let repository = DocumentCustomerRepository::new(DocumentStore::new(InMemoryStore::new()));
/// repository.ensure_indexes().await?;
/// ```
#[derive(Debug)]
pub struct DocumentCustomerRepository<B: StoreBackend> {
    store: DocumentStore<B>,
}

impl<B: StoreBackend> DocumentCustomerRepository<B> {
    pub fn new(store: DocumentStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    /// Creates the non-unique indexes backing the name lookups.
    pub async fn ensure_indexes(&self) -> DocumentStoreResult<()> {
        for field in [CustomerField::FirstName, CustomerField::LastName] {
            self.store
                .add_index(Customer::collection_name(), field.as_str(), false)
                .await?;
        }

        info!(collection = Customer::collection_name(), "customer indexes ensured");

        Ok(())
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.store.shutdown().await
    }
}

#[async_trait]
impl<B: StoreBackend> CustomerRepository for DocumentCustomerRepository<B> {
    async fn save(&self, customer: Customer) -> DocumentStoreResult<Customer> {
        debug!(id = ?customer.id(), "saving customer");

        self.store
            .typed_collection::<Customer>()
            .save(vec![customer])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DocumentStoreError::Backend("save returned no document".to_string()))
    }

    async fn find_by_field(&self, field: CustomerField, value: &str) -> DocumentStoreResult<Vec<Customer>> {
        self.store
            .typed_collection::<Customer>()
            .query(
                Query::builder()
                    .filter(Filter::eq(field.as_str(), value))
                    .build(),
            )
            .await
    }

    async fn find_by_id(&self, id: &str) -> DocumentStoreResult<Vec<Customer>> {
        self.store
            .typed_collection::<Customer>()
            .get(vec![id])
            .await
    }

    async fn find_all_by_id_in(&self, ids: &[String]) -> DocumentStoreResult<Vec<Customer>> {
        self.store
            .typed_collection::<Customer>()
            .get(ids.to_vec())
            .await
    }

    async fn find_all(&self) -> DocumentStoreResult<Vec<Customer>> {
        self.store
            .typed_collection::<Customer>()
            .query(Query::new())
            .await
    }

    async fn find_page(&self, request: PageRequest) -> DocumentStoreResult<Page<Customer>> {
        let customers = self.store.typed_collection::<Customer>();

        let total = customers.count(None).await?;
        let items = customers.query(request.to_query()).await?;

        Ok(request.to_page(items, usize::try_from(total).unwrap_or(usize::MAX)))
    }

    async fn delete_by_id(&self, id: &str) -> DocumentStoreResult<()> {
        self.store
            .typed_collection::<Customer>()
            .delete(vec![id])
            .await
    }

    async fn delete(&self, customer: &Customer) -> DocumentStoreResult<()> {
        match customer.id() {
            Some(id) => self.delete_by_id(id).await,
            None => Ok(()),
        }
    }

    async fn delete_all(&self, customers: Vec<Customer>) -> DocumentStoreResult<()> {
        let ids = customers
            .iter()
            .filter_map(|c| c.id().map(str::to_string))
            .collect::<Vec<_>>();

        if ids.is_empty() {
            return Ok(());
        }

        self.store
            .typed_collection::<Customer>()
            .delete(ids)
            .await
    }

    async fn count_by(&self, field: CustomerField, value: &str) -> DocumentStoreResult<u64> {
        self.store
            .typed_collection::<Customer>()
            .count(Some(Filter::eq(field.as_str(), value)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientele_core::query::Sort;
    use clientele_memory::InMemoryStore;

    fn repository() -> DocumentCustomerRepository<InMemoryStore> {
        DocumentCustomerRepository::new(DocumentStore::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn save_generates_ids_and_upserts_caller_ids() {
        let repository = repository();

        let generated = repository.save(Customer::new("John", "Doe", 1, 1)).await.unwrap();
        assert!(generated.id().is_some_and(|id| !id.is_empty()));

        repository.save(Customer::new("Jane", "Doe", 1, 1).with_id("fixed")).await.unwrap();
        repository.save(Customer::new("Janet", "Doe", 2, 2).with_id("fixed")).await.unwrap();

        let found = repository.find_by_id("fixed").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "Janet");
        assert_eq!(repository.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn field_lookups_and_counts() {
        let repository = repository();
        repository.save(Customer::new("John", "Doe", 1, 1)).await.unwrap();
        repository.save(Customer::new("John", "Roe", 1, 1)).await.unwrap();
        repository.save(Customer::new("Jane", "Doe", 1, 1)).await.unwrap();

        assert_eq!(repository.find_by_field(CustomerField::LastName, "Doe").await.unwrap().len(), 2);
        assert_eq!(repository.count_by(CustomerField::FirstName, "John").await.unwrap(), 2);
        assert_eq!(repository.count_by(CustomerField::FirstName, "Ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn pages_carry_totals() {
        let repository = repository();
        for name in ["e", "c", "a", "d", "b"] {
            repository.save(Customer::new(name, "Doe", 1, 1)).await.unwrap();
        }

        let page = repository
            .find_page(PageRequest::sorted(1, 2, vec![Sort::asc("firstName")]).unwrap())
            .await
            .unwrap();

        let names = page.items.iter().map(|c| c.first_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["c", "d"]);
        assert_eq!(page.count, 5);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.previous_page, Some(0));
    }

    #[tokio::test]
    async fn deletes_by_id_record_and_batch() {
        let repository = repository();
        let a = repository.save(Customer::new("A", "Doe", 1, 1)).await.unwrap();
        let b = repository.save(Customer::new("B", "Doe", 1, 1)).await.unwrap();
        let c = repository.save(Customer::new("C", "Doe", 1, 1)).await.unwrap();

        repository.delete_by_id(a.id().unwrap()).await.unwrap();
        repository.delete_by_id("missing").await.unwrap();
        repository.delete(&b).await.unwrap();
        repository.delete(&Customer::new("X", "Y", 1, 1)).await.unwrap();
        repository.delete_all(vec![c]).await.unwrap();
        repository.delete_all(vec![]).await.unwrap();

        assert!(repository.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_by_id_in_skips_unknown_ids() {
        let repository = repository();
        let a = repository.save(Customer::new("A", "Doe", 1, 1)).await.unwrap();

        let found = repository
            .find_all_by_id_in(&[a.id().unwrap().to_string(), "missing".to_string()])
            .await
            .unwrap();

        assert_eq!(found, vec![a]);
    }

    #[tokio::test]
    async fn ensure_indexes_succeeds_on_memory_backend() {
        let repository = repository();

        repository.ensure_indexes().await.unwrap();
        repository.shutdown().await.unwrap();
    }
}
