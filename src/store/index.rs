//! Composite index markers
//!
//! An index entry is a marker record whose key encodes an ordered tuple
//! of field values, `createCompositeKey(namespace + indexName, values)`,
//! and whose value is the single sentinel byte `0x00`.
//!
//! Creating the same tuple twice is not detected here; callers avoid it.

use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};

use super::accessor::{put_doc, Namespace};
use super::cursor::CursorGuard;
use super::errors::StoreResult;

/// Value stored under every index key
pub const INDEX_SENTINEL: [u8; 1] = [0x00];

/// A named composite index within a namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeIndex {
    namespace: Namespace,
    name: String,
}

impl CompositeIndex {
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// Object type handed to the host's composite key encoder
    pub fn object_type(&self) -> String {
        self.namespace.key(&self.name)
    }

    /// Physical key of the marker for `values`
    pub fn key(&self, stub: &dyn LedgerStub, values: &[&str]) -> StoreResult<String> {
        Ok(stub.create_composite_key(&self.object_type(), values)?)
    }

    /// Write the marker for `values`
    pub fn create(&self, stub: &mut dyn LedgerStub, values: &[&str]) -> StoreResult<()> {
        let key = self.key(stub, values)?;
        put_doc(stub, &key, &INDEX_SENTINEL)?;
        log_event_with_fields(Event::IndexCreated, &[("index", self.name.as_str())]);
        Ok(())
    }

    /// Delete the marker for `values`
    pub fn remove(&self, stub: &mut dyn LedgerStub, values: &[&str]) -> StoreResult<()> {
        let key = self.key(stub, values)?;
        stub.del_state(&key)?;
        log_event_with_fields(Event::IndexRemoved, &[("index", self.name.as_str())]);
        Ok(())
    }

    /// Every indexed tuple that starts with `prefix`, in key order
    pub fn list(&self, stub: &dyn LedgerStub, prefix: &[&str]) -> StoreResult<Vec<Vec<String>>> {
        let mut cursor = CursorGuard::new(
            stub.get_state_by_partial_composite_key(&self.object_type(), prefix)?,
        );

        let mut tuples = Vec::new();
        while cursor.has_next() {
            let entry = cursor.next_entry()?;
            let (_, attributes) = stub.split_composite_key(&entry.key)?;
            tuples.push(attributes);
        }
        cursor.close()?;

        Ok(tuples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Fault, MemoryLedger};

    fn status_index() -> CompositeIndex {
        CompositeIndex::new(Namespace::new("userInfo_"), "userStatus_2_userEmail")
    }

    #[test]
    fn test_create_writes_sentinel_under_composite_key() {
        let mut ledger = MemoryLedger::new();
        let index = status_index();

        let mut tx = ledger.begin();
        index.create(&mut tx, &["00", "a@b.c"]).unwrap();
        tx.commit();

        let key = "\u{0}userInfo_userStatus_2_userEmail\u{0}00\u{0}a@b.c\u{0}";
        assert_eq!(ledger.state(key), Some(&INDEX_SENTINEL[..]));
    }

    #[test]
    fn test_list_by_prefix_and_remove() {
        let mut ledger = MemoryLedger::new();
        let index = status_index();

        let mut tx = ledger.begin();
        index.create(&mut tx, &["00", "b@x"]).unwrap();
        index.create(&mut tx, &["00", "a@x"]).unwrap();
        index.create(&mut tx, &["99", "c@x"]).unwrap();
        tx.commit();

        let tx = ledger.begin();
        let tuples = index.list(&tx, &["00"]).unwrap();
        assert_eq!(
            tuples,
            vec![
                vec!["00".to_string(), "a@x".to_string()],
                vec!["00".to_string(), "b@x".to_string()],
            ]
        );
        assert_eq!(index.list(&tx, &[]).unwrap().len(), 3);
        drop(tx);

        let mut tx = ledger.begin();
        index.remove(&mut tx, &["00", "a@x"]).unwrap();
        tx.commit();

        let tx = ledger.begin();
        assert_eq!(index.list(&tx, &["00"]).unwrap().len(), 1);
        drop(tx);
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_reserved_separator_rejected() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        assert!(status_index().create(&mut tx, &["00", "bad\u{0}email"]).is_err());
        assert_eq!(tx.pending_writes(), 0);
    }

    #[test]
    fn test_list_closes_cursor_on_failure() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        status_index().create(&mut tx, &["00", "a"]).unwrap();
        tx.commit();

        ledger.inject(Fault::CursorNext { after: 0 });
        {
            let tx = ledger.begin();
            assert!(status_index().list(&tx, &["00"]).is_err());
        }
        assert_eq!(ledger.open_cursors(), 0);
    }
}
