//! Commonly used types, importable in one line:
//!
//! ```ignore
//! use clientele::prelude::*;
//! ```

pub use clientele_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::TypedCollection,
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult},
    page::{Page, PageRequest},
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, Sort, SortDirection},
    store::DocumentStore,
};

pub use crate::{
    clock::{Clock, OffsetClock},
    config::CustomerServiceConfig,
    customer::{Customer, CustomerField},
    repository::{CustomerRepository, DocumentCustomerRepository},
    service::CustomerService,
};
