//! In-memory document storage backend for clientele.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend`
//! trait. It is meant for development, tests and small deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON
//! - **Query support** - Equality and membership filters, multi-key sort, offset and limit
//!
//! # Quick Start
//!
//! ```ignore
//! use clientele_core::store::DocumentStore;
//! use clientele_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let customers = store.typed_collection::<Customer>();
//! customers.save(vec![customer]).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as clientele_memory;

pub mod store;
pub(crate) mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
