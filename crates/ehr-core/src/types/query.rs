//! Ledger range query type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidArgumentError};

/// A range-and-selector query handed to a ledger's paged scan.
///
/// The record store forwards queries untouched; interpreting them is the
/// ledger's job. The textual form is a JSON object with three optional keys:
///
/// ```text
/// {"startKey": "a", "endKey": "m", "selector": {"doc": true}}
/// ```
///
/// `startKey` is inclusive and `endKey` exclusive; an empty bound is open.
/// Every `selector` field must equal the same field of the stored document.
/// An empty string parses as the query that matches everything.
///
/// # Example
///
/// ```
/// use ehr_core::Query;
/// use serde_json::json;
///
/// let query: Query = r#"{"selector": {"name": "Annette KOEPP"}}"#.parse().unwrap();
/// assert_eq!(query.selector().get("name"), Some(&json!("Annette KOEPP")));
/// assert_eq!("".parse::<Query>().unwrap(), Query::all());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Query {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    start_key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    end_key: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    selector: Map<String, Value>,
}

impl Query {
    /// The query over the full key space with no selector.
    pub fn all() -> Self {
        Self::default()
    }

    /// A half-open key range `[start, end)`. Empty bounds are open.
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_key: start.into(),
            end_key: end.into(),
            selector: Map::new(),
        }
    }

    /// Add a field equality constraint.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.selector.insert(field.into(), value.into());
        self
    }

    /// Parse the textual form.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is neither empty nor a JSON object with
    /// only the documented keys.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.trim().is_empty() {
            return Ok(Self::all());
        }

        serde_json::from_str(s).map_err(|e| {
            InvalidArgumentError::Query {
                value: s.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Inclusive lower bound; empty when open.
    pub fn start_key(&self) -> &str {
        &self.start_key
    }

    /// Exclusive upper bound; empty when open.
    pub fn end_key(&self) -> &str {
        &self.end_key
    }

    pub fn selector(&self) -> &Map<String, Value> {
        &self.selector
    }

    /// Whether `key` falls inside the query's range.
    pub fn contains_key(&self, key: &str) -> bool {
        (self.start_key.is_empty() || key >= self.start_key.as_str())
            && (self.end_key.is_empty() || key < self.end_key.as_str())
    }

    /// Whether a stored row satisfies the query.
    ///
    /// Values that are not JSON objects never satisfy a non-empty selector.
    pub fn matches(&self, key: &str, value: &[u8]) -> bool {
        if !self.contains_key(key) {
            return false;
        }

        if self.selector.is_empty() {
            return true;
        }

        let Ok(Value::Object(document)) = serde_json::from_slice::<Value>(value) else {
            return false;
        };

        self.selector
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_text_is_everything() {
        assert_eq!(Query::parse("").unwrap(), Query::all());
        assert_eq!(Query::parse("  ").unwrap(), Query::all());
        assert_eq!(Query::parse("{}").unwrap(), Query::all());
    }

    #[test]
    fn parses_range_and_selector() {
        let query = Query::parse(r#"{"startKey":"a","endKey":"m","selector":{"doc":true}}"#)
            .unwrap();
        assert_eq!(query.start_key(), "a");
        assert_eq!(query.end_key(), "m");
        assert_eq!(query.selector().get("doc"), Some(&json!(true)));
    }

    #[test]
    fn rejects_unknown_keys_and_non_objects() {
        for input in [r#"{"limit": 3}"#, "[1,2]", "not json"] {
            let err = Query::parse(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument(InvalidArgumentError::Query { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn range_is_half_open() {
        let query = Query::range("b", "d");
        assert!(!query.contains_key("a"));
        assert!(query.contains_key("b"));
        assert!(query.contains_key("c"));
        assert!(!query.contains_key("d"));

        let open = Query::all();
        assert!(open.contains_key(""));
        assert!(open.contains_key("zzz"));
    }

    #[test]
    fn selector_matches_document_fields() {
        let query = Query::all().with_field("doc", true);
        assert!(query.matches("r1", br#"{"doc":true,"id":"r1"}"#));
        assert!(!query.matches("r1", br#"{"doc":false,"id":"r1"}"#));
        assert!(!query.matches("r1", br#"{"id":"r1"}"#));
        assert!(!query.matches("r1", b"not json"));
    }

    #[test]
    fn display_roundtrips() {
        let query = Query::range("a", "").with_field("name", "Annette KOEPP");
        let text = query.to_string();
        assert_eq!(text, r#"{"startKey":"a","selector":{"name":"Annette KOEPP"}}"#);
        assert_eq!(Query::parse(&text).unwrap(), query);
    }
}
