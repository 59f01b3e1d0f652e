//! Document record type.
//!
//! A document record is the per-vector metadata stored alongside each
//! embedding. Records are schemaless: downstream consumers only read the
//! keys they know about, so the type is an open JSON object rather than a
//! fixed struct.

use serde_json::{Map, Value};

/// Schemaless metadata record associated with one vector.
///
/// Position `i` in an index's record sequence corresponds to vector `i`.
pub type DocRecord = Map<String, Value>;

/// Key used by the default record built from a raw text.
pub const TEXT_KEY: &str = "text";

/// Key marking a sentinel record for a vector with no metadata.
pub const MISSING_KEY: &str = "_missing";

/// Build the default record for a text with no caller-supplied metadata.
pub fn text_record(text: &str) -> DocRecord {
    let mut record = Map::new();
    record.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    record
}

/// Build the sentinel record returned when a search hit has no
/// corresponding metadata entry.
pub fn missing_record() -> DocRecord {
    let mut record = Map::new();
    record.insert(MISSING_KEY.to_string(), Value::Bool(true));
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_record() {
        let record = text_record("hello");
        assert_eq!(record.get(TEXT_KEY), Some(&Value::String("hello".into())));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_missing_record() {
        let record = missing_record();
        assert_eq!(record.get(MISSING_KEY), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_record_is_open() {
        // Arbitrary keys round-trip through JSON untouched.
        let json = r#"{"id": 7, "tags": ["a", "b"], "nested": {"x": 1.5}}"#;
        let record: DocRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.get("id"), Some(&Value::from(7)));

        let back = serde_json::to_string(&record).unwrap();
        let reparsed: DocRecord = serde_json::from_str(&back).unwrap();
        assert_eq!(record, reparsed);
    }
}
