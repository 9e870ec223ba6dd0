//! Customer data access for clientele.
//!
//! This crate is the entry point for applications that store customers. It wraps a
//! clientele document store in a [`CustomerRepository`](repository::CustomerRepository)
//! and exposes a [`CustomerService`](service::CustomerService) facade that validates
//! input, stamps timestamps, handles paging and never returns errors: invalid input
//! and store failures both come back as `false`, an empty list, or `None`.
//!
//! # Features
//!
//! - **Upserting saves** - Saving with a known identifier replaces the stored record
//! - **Lookups** - By first name, last name, identifier or a set of identifiers
//! - **Paging** - 0-indexed pages with optional multi-key sorting
//! - **Backends** - In-memory storage, plus MongoDB behind the `mongodb` feature
//!
//! # Quick Start
//!
//! ```ignore
//! use clientele::{memory::InMemoryStore, prelude::*};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let service = CustomerService::new(DocumentCustomerRepository::new(store));
//!
//!     service.save(None, Some("Doe"), Some("John")).await;
//!     service.save(None, Some("Roe"), Some("Jane")).await;
//!
//!     let page = service
//!         .find_all_sorted(Some(0), Some(10), Some(vec![Sort::asc("lastName")]))
//!         .await;
//!
//!     println!("customers: {page:?}");
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - `mongodb` - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod clock;
pub mod config;
pub mod customer;
pub mod prelude;
pub mod repository;
pub mod service;

pub use clientele_core::{backend, collection, document, error, page, query, store};

pub use bson;

/// In-memory storage backend.
pub mod memory {
    pub use clientele_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend.
///
/// Only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use clientele_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
