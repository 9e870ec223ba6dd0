//! The document-store layer underneath the clientele customer facade.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Identity and BSON conversion for stored types
//! - **Store backend abstraction** ([`backend`]) - The trait concrete storage engines implement
//! - **Queries** ([`query`]) - Equality and membership filters, multi-key sort, limit/offset
//! - **Pagination** ([`page`]) - Page requests and result pages
//! - **Collections** ([`collection`]) - Typed access to one collection
//! - **Document store** ([`store`]) - Owns a backend and hands out collections
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use clientele_core::{document::Document, store::DocumentStore};
//!
//! let store = DocumentStore::new(backend);
//! let customers = store.typed_collection::<Customer>();
//! let saved = customers.save(vec![customer]).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as clientele_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod page;
pub mod query;
pub mod store;
