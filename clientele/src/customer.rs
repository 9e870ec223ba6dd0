//! The customer record.

use serde::{Deserialize, Serialize};

use clientele_core::document::Document;

/// A customer stored in the `customer` collection.
///
/// Stored field names are camelCase (`firstName`, `createdAt`, ...). Timestamps
/// are epoch seconds set by the service whenever the record is written.
///
/// Two customers are equal when they have the same identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Customer {
    /// Creates a customer without an identifier.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at,
            updated_at,
        }
    }

    /// Pre-assigns an identifier, so saving replaces whatever is stored under it.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Document for Customer {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn collection_name() -> &'static str {
        "customer"
    }
}

/// The customer fields the repository can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    FirstName,
    LastName,
}

impl CustomerField {
    /// The stored field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerField::FirstName => "firstName",
            CustomerField::LastName => "lastName",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use clientele_core::document::DocumentExt;

    #[test]
    fn stores_camel_case_fields() {
        let customer = Customer::new("John", "Doe", 10, 20).with_id("c-1");

        assert_eq!(
            customer.to_bson().unwrap(),
            Bson::Document(doc! {
                "id": "c-1",
                "firstName": "John",
                "lastName": "Doe",
                "createdAt": 10_i64,
                "updatedAt": 20_i64,
            })
        );
    }

    #[test]
    fn equality_is_by_identifier() {
        let a = Customer::new("John", "Doe", 1, 1).with_id("same");
        let b = Customer::new("Jane", "Roe", 2, 2).with_id("same");
        let c = Customer::new("John", "Doe", 1, 1).with_id("other");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn set_id_assigns_identifier() {
        let mut customer = Customer::new("John", "Doe", 1, 1);
        assert_eq!(customer.id(), None);

        customer.set_id("c-9".to_string());

        assert_eq!(customer.id(), Some("c-9"));
        assert_eq!(Customer::collection_name(), "customer");
    }

    #[test]
    fn field_names_match_stored_layout() {
        assert_eq!(CustomerField::FirstName.as_str(), "firstName");
        assert_eq!(CustomerField::LastName.as_str(), "lastName");
    }
}
