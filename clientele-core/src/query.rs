//! Query construction for document stores.
//!
//! A [`Query`] carries an optional filter expression, a limit, an offset and an
//! ordered list of sort keys. Backends execute queries by walking the filter with a
//! [`QueryVisitor`].
//!
//! ```ignore
//! use clientele_core::query::{Query, Filter, Sort};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("lastName", "Doe"))
//!     .sort(Sort::asc("firstName"))
//!     .limit(10)
//!     .offset(0)
//!     .build();
//! ```
//!
//! Only exact match ([`Filter::eq`]) is supported; lookups by identifier go
//! through the backend's keyed reads instead.

use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::error::DocumentStoreError;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// A single sort key: which field to sort by and in which direction.
///
/// Queries hold a list of these; later keys break ties left by earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction }
    }

    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
}

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }
}

/// Helper for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }
}

/// A structured query for retrieving documents.
///
/// Use [`QueryBuilder`] for ergonomic construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip (for pagination).
    pub offset: Option<usize>,
    /// Sort keys, applied in order.
    pub sort: Vec<Sort>,
}

impl Query {
    /// Creates a new empty query matching every document.
    pub fn new() -> Self {
        Query {
            filter: None,
            limit: None,
            offset: None,
            sort: Vec::new(),
        }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Appends a sort key. Keys apply in the order they are added.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.query.sort.push(sort);
        self
    }

    /// Appends every key of `sort`, in order.
    pub fn sort_by(mut self, sort: impl IntoIterator<Item = Sort>) -> Self {
        self.query.sort.extend(sort);
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks a filter expression, producing a backend-specific output.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_sort_keys_in_order() {
        let query = Query::builder()
            .sort(Sort::asc("lastName"))
            .sort_by(vec![Sort::desc("firstName"), Sort::asc("createdAt")])
            .build();

        let fields = query
            .sort
            .iter()
            .map(|s| (s.field.as_str(), s.direction))
            .collect::<Vec<_>>();

        assert_eq!(
            fields,
            vec![
                ("lastName", SortDirection::Asc),
                ("firstName", SortDirection::Desc),
                ("createdAt", SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn eq_builds_field_expression() {
        assert_eq!(
            Filter::eq("lastName", "Doe"),
            Expr::Field {
                field: "lastName".to_string(),
                op: FieldOp::Eq,
                value: Bson::from("Doe"),
            }
        );
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = Query::new();

        assert!(query.filter.is_none());
        assert!(query.limit.is_none());
        assert!(query.offset.is_none());
        assert!(query.sort.is_empty());
    }
}
