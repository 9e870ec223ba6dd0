//! Core traits for document representation and serialization.
//!
//! Every stored type implements [`Document`]; [`DocumentExt`] is implemented
//! automatically and converts documents to and from their BSON form.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::DocumentStoreResult;

/// Core trait that all documents stored in a document store must implement.
///
/// A document carries an optional string identifier. Documents without one are
/// assigned an identifier generated by the backend when they are first saved;
/// documents that already carry one are written under that identifier, replacing
/// whatever was stored there before.
///
/// # Example
///
/// ```ignore
/// use clientele_core::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Note {
///     #[serde(default, skip_serializing_if = "Option::is_none")]
///     pub id: Option<String>,
///     pub body: String,
/// }
///
/// impl Document for Note {
///     fn id(&self) -> Option<&str> {
///         self.id.as_deref()
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = Some(id);
///     }
///
///     fn collection_name() -> &'static str {
///         "notes"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's identifier, if it has been assigned one.
    fn id(&self) -> Option<&str>;

    /// Assigns an identifier to this document.
    fn set_id(&mut self, id: String);

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "customer", "orders").
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// Implemented automatically for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}
