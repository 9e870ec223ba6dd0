//! MongoDB backend implementation for clientele.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Enable it through the `mongodb` feature of the `clientele` crate:
//!
//! ```toml
//! [dependencies]
//! clientele = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Upserts** - Saves are `replaceOne` calls with `upsert: true`, keyed by `_id`
//! - **Query support** - Filters, multi-key sort, skip/limit and counts run server-side
//! - **Indexing** - Creating and dropping single-field indexes
//!
//! # Example
//!
//! ```ignore
//! use clientele_core::backend::StoreBackendBuilder;
//! use clientele_mongodb::MongoDbStore;
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "crm")
//!     .build()
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as clientele_mongodb;

pub mod store;
pub(crate) mod query;
pub(crate) mod sanitizer;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
