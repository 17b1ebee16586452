//! Selector evaluation for the in-memory host
//!
//! Supports the subset of CouchDB selector syntax the document store
//! emits: top-level field equality, written either as a bare value or as
//! `{"$eq": value}`. Every clause must match (AND semantics). No type
//! coercion.

use serde_json::{Map, Value};

use super::errors::{LedgerError, LedgerResult};

/// A parsed equality selector
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorFilter {
    clauses: Vec<(String, Value)>,
}

impl SelectorFilter {
    /// Parse a query string of the form `{"selector": {...}}`
    pub fn parse(query: &str) -> LedgerResult<Self> {
        let root: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::InvalidQuery(format!("malformed JSON: {}", e)))?;

        let selector = root
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| LedgerError::InvalidQuery("missing selector object".to_string()))?;

        let clauses = selector
            .iter()
            .map(|(field, condition)| Ok((field.clone(), Self::equality_operand(field, condition)?)))
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(Self { clauses })
    }

    fn equality_operand(field: &str, condition: &Value) -> LedgerResult<Value> {
        match condition {
            Value::Object(ops) => Self::operator_operand(field, ops),
            other => Ok(other.clone()),
        }
    }

    fn operator_operand(field: &str, ops: &Map<String, Value>) -> LedgerResult<Value> {
        match (ops.len(), ops.get("$eq")) {
            (1, Some(v)) => Ok(v.clone()),
            _ => Err(LedgerError::InvalidQuery(format!(
                "unsupported condition on field '{}'",
                field
            ))),
        }
    }

    /// Checks a raw stored value against every clause.
    ///
    /// Values that are not JSON objects never match.
    pub fn matches_bytes(&self, value: &[u8]) -> bool {
        match serde_json::from_slice::<Value>(value) {
            Ok(doc) => self.matches(&doc),
            Err(_) => false,
        }
    }

    /// Checks a document against every clause
    pub fn matches(&self, document: &Value) -> bool {
        if !document.is_object() {
            return false;
        }
        self.clauses
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_equality() {
        let filter =
            SelectorFilter::parse(r#"{"selector":{"docType":"userInfo","userStatus":"00"}}"#)
                .unwrap();
        assert!(filter.matches(&json!({"docType": "userInfo", "userStatus": "00", "x": 1})));
        assert!(!filter.matches(&json!({"docType": "userInfo", "userStatus": "99"})));
        assert!(!filter.matches(&json!({"docType": "userInfo"})));
    }

    #[test]
    fn test_eq_operator() {
        let filter = SelectorFilter::parse(r#"{"selector":{"n":{"$eq":5}}}"#).unwrap();
        assert!(filter.matches(&json!({"n": 5})));
        assert!(!filter.matches(&json!({"n": "5"})));
    }

    #[test]
    fn test_unsupported_operator_rejected() {
        let err = SelectorFilter::parse(r#"{"selector":{"n":{"$gt":5}}}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidQuery(_)));
    }

    #[test]
    fn test_missing_selector_rejected() {
        assert!(SelectorFilter::parse(r#"{"fields":["a"]}"#).is_err());
        assert!(SelectorFilter::parse("not json").is_err());
    }

    #[test]
    fn test_non_object_values_never_match() {
        let filter = SelectorFilter::parse(r#"{"selector":{}}"#).unwrap();
        assert!(filter.matches_bytes(br#"{"a":1}"#));
        assert!(!filter.matches_bytes(b"1.0"));
        assert!(!filter.matches_bytes(&[0x00]));
    }
}
