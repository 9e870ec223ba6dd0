//! Query translation into MongoDB query syntax.

use bson::{Document, Bson, doc};

use clientele_core::{
    query::{QueryVisitor, FieldOp, Sort, SortDirection},
    error::DocumentStoreError,
};

use crate::sanitizer::ValueSanitizer;


/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Builds a MongoDB sort document, keeping the key order of `sort`.
    pub(crate) fn sort_document(sort: &[Sort]) -> Document {
        sort.iter()
            .map(|key| {
                (
                    ValueSanitizer::sanitize_string(&key.field),
                    Bson::Int32(match key.direction {
                        SortDirection::Asc => 1,
                        SortDirection::Desc => -1,
                    }),
                )
            })
            .collect()
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let field = ValueSanitizer::sanitize_string(field);

        let condition = match op {
            FieldOp::Eq => doc! { "$eq": value.clone() },
        };

        Ok(doc! { field: condition })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientele_core::query::Filter;

    #[test]
    fn eq_translates_to_eq_operator() {
        let translated = MongoQueryTranslator
            .visit_expr(&Filter::eq("firstName", "John"))
            .unwrap();

        assert_eq!(translated, doc! { "firstName": { "$eq": "John" } });
    }

    #[test]
    fn dotted_field_keys_are_escaped() {
        let translated = MongoQueryTranslator
            .visit_expr(&Filter::eq("a.b", 1))
            .unwrap();

        assert_eq!(translated.keys().count(), 1);
        assert!(!translated.keys().any(|k| k.contains('.')));
    }

    #[test]
    fn sort_document_keeps_key_order() {
        let sort = MongoQueryTranslator::sort_document(&[Sort::desc("lastName"), Sort::asc("firstName")]);

        assert_eq!(sort, doc! { "lastName": -1, "firstName": 1 });
        assert_eq!(
            sort.keys().collect::<Vec<_>>(),
            vec!["lastName", "firstName"]
        );
    }
}
