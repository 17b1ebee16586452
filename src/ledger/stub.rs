//! The host ledger surface consumed by the document store.

use super::composite;
use super::errors::LedgerResult;

/// A single `(key, value)` pair yielded by a state query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub key: String,
    pub value: Vec<u8>,
}

/// Commit timestamp as recorded by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTimestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// One committed mutation of a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    pub tx_id: String,
    /// Post-mutation value; empty for deletes
    pub value: Vec<u8>,
    pub timestamp: LedgerTimestamp,
    pub is_delete: bool,
}

/// A host-side cursor.
///
/// Cursors must be closed by the caller on every exit path. The store
/// wraps them in [`crate::store::CursorGuard`] to guarantee this.
pub trait LedgerCursor {
    type Item;

    /// Whether another entry can be read
    fn has_next(&self) -> bool;

    /// Read the next entry
    fn next_entry(&mut self) -> LedgerResult<Self::Item>;

    /// Release the cursor. Closing twice is a no-op.
    fn close(&mut self) -> LedgerResult<()>;
}

/// Cursor over `(key, value)` pairs
pub type StateCursor = Box<dyn LedgerCursor<Item = QueryResult>>;

/// Cursor over the change log of one key
pub type HistoryCursor = Box<dyn LedgerCursor<Item = KeyModification>>;

/// Transaction-scoped view of the host ledger.
///
/// One stub is handed to each invocation. Writes are buffered into the
/// transaction's write set; the host decides whether to commit them.
pub trait LedgerStub {
    /// Host-assigned id of the current transaction
    fn tx_id(&self) -> &str;

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: &[u8]) -> LedgerResult<()>;

    fn del_state(&mut self, key: &str) -> LedgerResult<()>;

    /// Run a JSON selector query, e.g. `{"selector":{"docType":"x"}}`
    fn get_query_result(&self, query: &str) -> LedgerResult<StateCursor>;

    fn get_history_for_key(&self, key: &str) -> LedgerResult<HistoryCursor>;

    /// Range scan over every composite key starting with the given parts
    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> LedgerResult<StateCursor>;

    fn create_composite_key(&self, object_type: &str, attributes: &[&str]) -> LedgerResult<String> {
        composite::create_composite_key(object_type, attributes)
    }

    fn split_composite_key(&self, key: &str) -> LedgerResult<(String, Vec<String>)> {
        composite::split_composite_key(key)
    }
}
