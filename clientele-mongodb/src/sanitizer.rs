//! Field name sanitization for MongoDB compatibility.
//!
//! MongoDB restricts document keys: they may not contain dots, dollar signs or
//! null bytes. Keys are escaped on the way in and restored on the way out.
//! Values are stored untouched so equality filters match what callers wrote.

use bson::Bson;


pub(crate) struct ValueSanitizer;

impl ValueSanitizer {
    const REPLACEMENTS: [(&'static str, &'static str); 3] = [
        (".", "__dot__"),
        ("$", "__dollar__"),
        ("\0", "__null__"),
    ];

    /// Recursively escapes the keys of every document nested in `value`.
    pub(crate) fn sanitize_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(
                arr
                    .iter()
                    .map(Self::sanitize_value)
                    .collect(),
            ),
            Bson::Document(doc) => Bson::Document(
                doc.iter()
                    .map(|(k, v)| (Self::sanitize_string(k), Self::sanitize_value(v)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }

    pub(crate) fn sanitize_string(input: &str) -> String {
        let mut sanitized = input.to_string();
        for (target, replacement) in Self::REPLACEMENTS.iter() {
            sanitized = sanitized.replace(*target, *replacement);
        }
        sanitized
    }

    /// Inverse of [`ValueSanitizer::sanitize_value`].
    pub(crate) fn restore_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(
                arr
                    .iter()
                    .map(Self::restore_value)
                    .collect(),
            ),
            Bson::Document(doc) => Bson::Document(
                doc.iter()
                    .map(|(k, v)| (Self::restore_string(k), Self::restore_value(v)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }

    pub(crate) fn restore_string(input: &str) -> String {
        let mut restored = input.to_string();
        for (target, replacement) in Self::REPLACEMENTS.iter().rev() {
            restored = restored.replace(*replacement, *target);
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn keys_are_escaped_and_values_kept() {
        let value = Bson::Document(doc! { "a.b": "x.y", "nested": { "$k": 1 } });

        assert_eq!(
            ValueSanitizer::sanitize_value(&value),
            Bson::Document(doc! { "a__dot__b": "x.y", "nested": { "__dollar__k": 1 } })
        );
    }

    #[test]
    fn restore_reverses_sanitize() {
        let value = Bson::Document(doc! { "first.name": "J.R.", "list": [{ "$x": "$y" }] });

        assert_eq!(
            ValueSanitizer::restore_value(&ValueSanitizer::sanitize_value(&value)),
            value
        );
    }
}
