//! Query execution over the host predicate engine
//!
//! Results are passed through as raw JSON: each stored value becomes one
//! array element without being re-encoded. The cursor is closed on every
//! exit path.

use serde_json::value::RawValue;

use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};

use super::cursor::CursorGuard;
use super::errors::{StoreError, StoreResult};
use super::selector::Selector;

/// All documents matching `selector`, as a JSON array in host order
pub fn query_all(stub: &dyn LedgerStub, selector: &Selector) -> StoreResult<Vec<u8>> {
    query_all_raw(stub, &selector.to_query_string()?)
}

/// All documents matching a prebuilt query string, as a JSON array
pub fn query_all_raw(stub: &dyn LedgerStub, query: &str) -> StoreResult<Vec<u8>> {
    log_event_with_fields(Event::QueryBegin, &[("query", query)]);

    let mut cursor = CursorGuard::new(stub.get_query_result(query)?);
    let mut documents: Vec<Box<RawValue>> = Vec::new();
    while cursor.has_next() {
        let entry = cursor.next_entry()?;
        documents.push(raw_json(entry.value)?);
    }
    cursor.close()?;

    let buffer = serde_json::to_vec(&documents)?;
    log_event_with_fields(
        Event::QueryComplete,
        &[("query", query), ("rows", documents.len().to_string().as_str())],
    );
    Ok(buffer)
}

/// The single document matching `selector`.
///
/// `None` when nothing matches; an error when more than one does.
pub fn query_one(stub: &dyn LedgerStub, selector: &Selector) -> StoreResult<Option<Vec<u8>>> {
    query_one_raw(stub, &selector.to_query_string()?)
}

/// The single document matching a prebuilt query string
pub fn query_one_raw(stub: &dyn LedgerStub, query: &str) -> StoreResult<Option<Vec<u8>>> {
    log_event_with_fields(Event::QueryBegin, &[("query", query)]);

    let mut cursor = CursorGuard::new(stub.get_query_result(query)?);
    let mut found: Option<Vec<u8>> = None;
    while cursor.has_next() {
        let entry = cursor.next_entry()?;
        if found.is_some() {
            cursor.close()?;
            return Err(StoreError::not_unique(query));
        }
        found = Some(entry.value);
    }
    cursor.close()?;

    let rows = if found.is_some() { "1" } else { "0" };
    log_event_with_fields(Event::QueryComplete, &[("query", query), ("rows", rows)]);
    Ok(found)
}

/// Wrap stored bytes as a raw JSON element
pub(crate) fn raw_json(bytes: Vec<u8>) -> StoreResult<Box<RawValue>> {
    let text = String::from_utf8(bytes)
        .map_err(|e| StoreError::serialization(format!("stored value is not UTF-8: {}", e)))?;
    Ok(RawValue::from_string(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Fault, MemoryLedger};
    use crate::store::StoreErrorCode;

    fn seeded() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        tx.put_state("u_a", br#"{"docType":"user","status":"00","email":"a"}"#)
            .unwrap();
        tx.put_state("u_b", br#"{"docType":"user","status":"00","email":"b"}"#)
            .unwrap();
        tx.put_state("u_c", br#"{"docType":"user","status":"99","email":"c"}"#)
            .unwrap();
        tx.put_state("o_a", br#"{"docType":"other","status":"00"}"#)
            .unwrap();
        tx.commit();
        ledger
    }

    #[test]
    fn test_query_all_builds_array() {
        let mut ledger = seeded();
        let tx = ledger.begin();
        let bytes = query_all(&tx, &Selector::doc_type("user").field("status", "00")).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let emails: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["email"].as_str().unwrap())
            .collect();
        assert_eq!(emails, vec!["a", "b"]);
    }

    #[test]
    fn test_query_all_passes_values_through() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        tx.put_state("k", br#"{"docType":"t", "spaced" : 1}"#).unwrap();
        tx.commit();

        let tx = ledger.begin();
        let bytes = query_all(&tx, &Selector::doc_type("t")).unwrap();
        assert_eq!(bytes, br#"[{"docType":"t", "spaced" : 1}]"#.to_vec());
    }

    #[test]
    fn test_query_all_empty() {
        let mut ledger = seeded();
        let tx = ledger.begin();
        let bytes = query_all(&tx, &Selector::doc_type("user").field("status", "42")).unwrap();
        assert_eq!(bytes, b"[]".to_vec());
    }

    #[test]
    fn test_query_one_cardinality() {
        let mut ledger = seeded();
        {
            let tx = ledger.begin();

            let none = query_one(&tx, &Selector::doc_type("user").field("status", "42")).unwrap();
            assert!(none.is_none());

            let one = query_one(&tx, &Selector::doc_type("user").field("status", "99"))
                .unwrap()
                .unwrap();
            let doc: serde_json::Value = serde_json::from_slice(&one).unwrap();
            assert_eq!(doc["email"], "c");

            let err = query_one(&tx, &Selector::doc_type("user").field("status", "00")).unwrap_err();
            assert_eq!(err.code(), StoreErrorCode::NotUnique);
        }
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_cursor_closed_on_mid_iteration_failure() {
        let mut ledger = seeded();
        ledger.inject(Fault::CursorNext { after: 1 });
        {
            let tx = ledger.begin();
            let err = query_all(&tx, &Selector::doc_type("user")).unwrap_err();
            assert_eq!(err.code(), StoreErrorCode::LedgerFailure);
        }
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_invalid_stored_bytes_are_serialization_errors() {
        let err = raw_json(b"{not json".to_vec()).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::Serialization);
        let err = raw_json(vec![0xff, 0xfe]).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::Serialization);
        assert!(raw_json(b" 1.0 ".to_vec()).is_ok());
    }

    #[test]
    fn test_query_failure_propagates() {
        let mut ledger = seeded();
        ledger.inject(Fault::Query);
        let tx = ledger.begin();
        let err = query_one(&tx, &Selector::doc_type("user")).unwrap_err();
        assert!(err.message().contains("injected query failure"));
    }
}
