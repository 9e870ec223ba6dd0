//! The customer access facade.
//!
//! [`CustomerService`] validates caller input, turns page and sort parameters into
//! store requests and flattens every outcome into a neutral value. None of its
//! operations return an error:
//!
//! - invalid input (blank names or ids, missing page parameters) yields `false`,
//!   an empty list, or `None` for counts, without touching the store;
//! - store failures yield the same neutral values and are logged at `warn`;
//! - absence is never reported: deletes succeed whether or not a record existed.
//!
//! A value is blank when it is `None`, empty, or whitespace only.

use chrono::{FixedOffset, Offset, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use clientele_core::{
    error::DocumentStoreResult,
    page::PageRequest,
    query::Sort,
};

use crate::{
    clock::{Clock, OffsetClock},
    config::{CustomerServiceConfig, DEFAULT_UTC_OFFSET_SECONDS},
    customer::{Customer, CustomerField},
    repository::CustomerRepository,
};

/// Returns the value unless it is blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Collapses a store result into its value, or `fallback` after logging the error.
fn or_neutral<T>(operation: &str, result: DocumentStoreResult<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(operation, error = %err, "customer store operation failed");
            fallback
        }
    }
}

/// Customer create/update, lookup, listing, deletion and counting.
///
/// The service holds no state besides its repository and clock; it is safe to
/// share between tasks when the repository is. It provides no atomicity across
/// operations: concurrent saves to one identifier are last-write-wins, and
/// [`delete_by_ids`](Self::delete_by_ids) resolves and deletes in two steps.
///
/// # Example
///
/// ```ignore
/// use clientele::prelude::*;
///
/// let repository = DocumentCustomerRepository::new(DocumentStore::new(InMemoryStore::new()));
/// let service = CustomerService::new(repository);
///
/// assert!(service.save(None, Some("Doe"), Some("John")).await);
/// assert_eq!(service.find_by_last_name(Some("Doe")).await.len(), 1);
/// ```
#[derive(Debug)]
pub struct CustomerService<R: CustomerRepository> {
    repository: R,
    clock: Arc<dyn Clock>,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a service with the default configuration (timestamps in UTC+8).
    pub fn new(repository: R) -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS).unwrap_or(Utc.fix());

        Self::with_clock(repository, Arc::new(OffsetClock::new(offset)))
    }

    /// Creates a service from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an initialization error if the configured offset is out of range.
    pub fn with_config(repository: R, config: &CustomerServiceConfig) -> DocumentStoreResult<Self> {
        Ok(Self::with_clock(repository, Arc::new(OffsetClock::new(config.utc_offset()?))))
    }

    /// Creates a service that stamps records with `clock`.
    pub fn with_clock(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates or replaces a customer.
    ///
    /// Returns `false` without touching the store if either name is blank. Both
    /// timestamps are set to now. A non-blank `id` makes this a replace of the
    /// record stored under it (or an insert under that id); otherwise the store
    /// generates an identifier. Returns `true` iff the store accepted the write.
    pub async fn save(&self, id: Option<&str>, last_name: Option<&str>, first_name: Option<&str>) -> bool {
        let (Some(first_name), Some(last_name)) = (present(first_name), present(last_name)) else {
            debug!("rejecting save with blank name");
            return false;
        };

        let now = self.clock.now_epoch_seconds();
        let mut customer = Customer::new(first_name, last_name, now, now);

        if let Some(id) = present(id) {
            customer = customer.with_id(id);
        }

        or_neutral("save", self.repository.save(customer).await.map(|_| true), false)
    }

    /// Customers with exactly this first name. Blank input yields an empty list.
    pub async fn find_by_first_name(&self, first_name: Option<&str>) -> Vec<Customer> {
        self.find_by_field(CustomerField::FirstName, first_name).await
    }

    /// Customers with exactly this last name. Blank input yields an empty list.
    pub async fn find_by_last_name(&self, last_name: Option<&str>) -> Vec<Customer> {
        self.find_by_field(CustomerField::LastName, last_name).await
    }

    async fn find_by_field(&self, field: CustomerField, value: Option<&str>) -> Vec<Customer> {
        let Some(value) = present(value) else {
            return Vec::new();
        };

        debug!(field = field.as_str(), value, "finding customers by field");

        or_neutral("find_by_field", self.repository.find_by_field(field, value).await, Vec::new())
    }

    /// Customers stored under `id`, as a list. Blank input yields an empty list.
    pub async fn find_by_id(&self, id: Option<&str>) -> Vec<Customer> {
        let Some(id) = present(id) else {
            return Vec::new();
        };

        debug!(id, "finding customer by id");

        or_neutral("find_by_id", self.repository.find_by_id(id).await, Vec::new())
    }

    /// Every customer.
    pub async fn find_all(&self) -> Vec<Customer> {
        or_neutral("find_all", self.repository.find_all().await, Vec::new())
    }

    /// The customers on page `page` (0-indexed) of `size` customers each.
    ///
    /// A missing parameter, or a size of zero, yields an empty list without
    /// touching the store. Only the page's items are returned.
    pub async fn find_all_paged(&self, page: Option<usize>, size: Option<usize>) -> Vec<Customer> {
        self.find_all_sorted(page, size, Some(Vec::new())).await
    }

    /// Like [`find_all_paged`](Self::find_all_paged), ordered by `sort`.
    ///
    /// A missing `sort` yields an empty list; an empty one leaves the order to
    /// the store.
    pub async fn find_all_sorted(
        &self,
        page: Option<usize>,
        size: Option<usize>,
        sort: Option<Vec<Sort>>,
    ) -> Vec<Customer> {
        let (Some(page), Some(size), Some(sort)) = (page, size, sort) else {
            return Vec::new();
        };

        let request = match PageRequest::sorted(page, size, sort) {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "rejecting page request");
                return Vec::new();
            }
        };

        debug!(page, size, "listing customer page");

        or_neutral(
            "find_page",
            self.repository
                .find_page(request)
                .await
                .map(|page| page.into_items()),
            Vec::new(),
        )
    }

    /// Customers stored under any of `ids`. Unknown ids are skipped; a missing or
    /// empty list yields an empty list.
    pub async fn find_all_by_ids(&self, ids: Option<&[String]>) -> Vec<Customer> {
        let Some(ids) = ids.filter(|ids| !ids.is_empty()) else {
            return Vec::new();
        };

        debug!(count = ids.len(), "finding customers by ids");

        or_neutral("find_all_by_id_in", self.repository.find_all_by_id_in(ids).await, Vec::new())
    }

    /// Deletes the customer stored under `id`.
    ///
    /// Reports `true` whether or not such a customer existed. A blank id is
    /// invalid input and reports `false` without touching the store, as does a
    /// store failure.
    pub async fn delete_by_id(&self, id: Option<&str>) -> bool {
        let Some(id) = present(id) else {
            debug!("rejecting delete with blank id");
            return false;
        };

        debug!(id, "deleting customer");

        or_neutral("delete_by_id", self.repository.delete_by_id(id).await.map(|_| true), false)
    }

    /// Deletes `customer`. Reports `true` unless the store fails.
    pub async fn delete(&self, customer: &Customer) -> bool {
        or_neutral("delete", self.repository.delete(customer).await.map(|_| true), false)
    }

    /// Deletes every customer stored under any of `ids`.
    ///
    /// A missing or empty list reports `false` without touching the store.
    /// Otherwise the ids are first resolved to customers, then those customers
    /// are deleted; unknown ids are ignored and the call still reports `true`.
    /// The two steps are not atomic.
    pub async fn delete_by_ids(&self, ids: Option<&[String]>) -> bool {
        if ids.is_none_or(|ids| ids.is_empty()) {
            return false;
        }

        let customers = self.find_all_by_ids(ids).await;

        debug!(requested = ids.map_or(0, <[String]>::len), resolved = customers.len(), "deleting customers");

        or_neutral("delete_all", self.repository.delete_all(customers).await.map(|_| true), false)
    }

    /// Number of customers with exactly this first name.
    ///
    /// Blank input yields `None`, as does a store failure; no matches yield `Some(0)`.
    pub async fn count_by_first_name(&self, first_name: Option<&str>) -> Option<u64> {
        let first_name = present(first_name)?;

        or_neutral(
            "count_by",
            self.repository
                .count_by(CustomerField::FirstName, first_name)
                .await
                .map(Some),
            None,
        )
    }
}
