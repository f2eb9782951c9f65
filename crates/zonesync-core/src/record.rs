//! Normalized zone record model

use serde::{Deserialize, Serialize};

/// A single DNS resource entry as seen by callers
///
/// The record type is kept as an opaque string: the provider accepts any
/// type token, so the set is not closed here either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Fully-qualified owner name, ending in a dot (e.g. "www.example.com.")
    pub name: String,

    /// Record type token (A, AAAA, CNAME, TXT, MX, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record data; interpretation depends on the type
    pub value: String,

    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: u32,
}

impl Record {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl,
        }
    }

    /// Whether this is a TXT record (case-insensitive)
    pub fn is_txt(&self) -> bool {
        self.record_type.eq_ignore_ascii_case("TXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_type_key() {
        let record = Record::new("acme.com.", "A", "1.2.3.4", 300);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "A");

        let parsed: Record =
            serde_json::from_str(r#"{"name":"acme.com.","type":"MX","value":"10 mx.acme.com."}"#)
                .unwrap();
        assert_eq!(parsed.ttl, 0);
        assert_eq!(parsed.record_type, "MX");
    }

    #[test]
    fn test_is_txt() {
        assert!(Record::new("a.", "txt", "x", 1).is_txt());
        assert!(!Record::new("a.", "A", "x", 1).is_txt());
    }
}
