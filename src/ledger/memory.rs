//! In-memory host ledger
//!
//! Keeps committed state in key order, a per-key change log, and hands
//! out transaction-scoped stubs whose writes are buffered until commit.
//!
//! # Semantics
//!
//! - Reads inside a transaction see committed state only
//! - Commit applies the write set atomically with one timestamp
//! - History lists committed mutations oldest first
//! - Open cursors are counted so leaks are observable
//!
//! Faults can be injected per operation to exercise error paths.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::composite::{create_composite_key, COMPOSITE_KEY_NAMESPACE, MAX_UNICODE_RUNE};
use super::errors::{LedgerError, LedgerResult};
use super::filter::SelectorFilter;
use super::stub::{
    HistoryCursor, KeyModification, LedgerCursor, LedgerStub, LedgerTimestamp, QueryResult,
    StateCursor,
};

/// A failure to inject into host calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Get,
    Put,
    Delete,
    Query,
    History,
    /// Cursors fail when reading the entry at this position
    CursorNext { after: usize },
}

/// In-memory ledger with per-key history
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    faults: Vec<Fault>,
    committed_writes: u64,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transaction with a generated id
    pub fn begin(&mut self) -> MemoryTransaction<'_> {
        let tx_id = Uuid::new_v4().simple().to_string();
        self.begin_with_id(tx_id)
    }

    /// Start a transaction with a caller-chosen id
    pub fn begin_with_id(&mut self, tx_id: impl Into<String>) -> MemoryTransaction<'_> {
        MemoryTransaction {
            ledger: self,
            tx_id: tx_id.into(),
            write_set: BTreeMap::new(),
        }
    }

    /// Make every matching host call fail until cleared
    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Number of key mutations applied by committed transactions
    pub fn committed_writes(&self) -> u64 {
        self.committed_writes
    }

    /// Number of cursors opened and not yet closed
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Committed value of a key
    pub fn state(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    fn has_fault(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    fn cursor_fail_point(&self) -> Option<usize> {
        self.faults.iter().find_map(|f| match f {
            Fault::CursorNext { after } => Some(*after),
            _ => None,
        })
    }

    fn check(&self, fault: Fault, op: &str) -> LedgerResult<()> {
        if self.has_fault(fault) {
            return Err(LedgerError::Io(format!("injected {} failure", op)));
        }
        Ok(())
    }

    fn open_cursor<T>(&self, entries: Vec<T>) -> MemoryCursor<T> {
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        MemoryCursor {
            entries: entries.into(),
            open: Some(Arc::clone(&self.open_cursors)),
            fail_after: self.cursor_fail_point(),
            yielded: 0,
        }
    }

    fn apply(&mut self, tx_id: &str, write_set: BTreeMap<String, Option<Vec<u8>>>) -> LedgerTimestamp {
        let now = Utc::now();
        let timestamp = LedgerTimestamp {
            seconds: now.timestamp(),
            nanos: now.timestamp_subsec_nanos() as i32,
        };

        for (key, op) in write_set {
            let modification = match op {
                Some(value) => {
                    self.state.insert(key.clone(), value.clone());
                    KeyModification {
                        tx_id: tx_id.to_string(),
                        value,
                        timestamp,
                        is_delete: false,
                    }
                }
                None => {
                    if self.state.remove(&key).is_none() {
                        continue;
                    }
                    KeyModification {
                        tx_id: tx_id.to_string(),
                        value: Vec::new(),
                        timestamp,
                        is_delete: true,
                    }
                }
            };
            self.history.entry(key).or_default().push(modification);
            self.committed_writes += 1;
        }

        timestamp
    }
}

/// A transaction over a [`MemoryLedger`]
///
/// Dropping the transaction without calling [`MemoryTransaction::commit`]
/// discards its write set.
pub struct MemoryTransaction<'a> {
    ledger: &'a mut MemoryLedger,
    tx_id: String,
    write_set: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a> MemoryTransaction<'a> {
    /// Number of buffered key mutations
    pub fn pending_writes(&self) -> usize {
        self.write_set.len()
    }

    /// Apply the write set and return the commit timestamp
    pub fn commit(self) -> LedgerTimestamp {
        let MemoryTransaction {
            ledger,
            tx_id,
            write_set,
        } = self;
        ledger.apply(&tx_id, write_set)
    }

    /// Discard the write set
    pub fn rollback(self) {}
}

impl<'a> LedgerStub for MemoryTransaction<'a> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.ledger.check(Fault::Get, "get")?;
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        Ok(self.ledger.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.ledger.check(Fault::Put, "put")?;
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        self.write_set.insert(key.to_string(), Some(value.to_vec()));
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> LedgerResult<()> {
        self.ledger.check(Fault::Delete, "delete")?;
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        self.write_set.insert(key.to_string(), None);
        Ok(())
    }

    fn get_query_result(&self, query: &str) -> LedgerResult<StateCursor> {
        self.ledger.check(Fault::Query, "query")?;
        let filter = SelectorFilter::parse(query)?;

        let matches: Vec<QueryResult> = self
            .ledger
            .state
            .iter()
            .filter(|(key, _)| !key.starts_with(COMPOSITE_KEY_NAMESPACE))
            .filter(|(_, value)| filter.matches_bytes(value))
            .map(|(key, value)| QueryResult {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        Ok(Box::new(self.ledger.open_cursor(matches)))
    }

    fn get_history_for_key(&self, key: &str) -> LedgerResult<HistoryCursor> {
        self.ledger.check(Fault::History, "history")?;
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        let entries: Vec<KeyModification> =
            self.ledger.history.get(key).cloned().unwrap_or_default();
        Ok(Box::new(self.ledger.open_cursor(entries)))
    }

    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> LedgerResult<StateCursor> {
        self.ledger.check(Fault::Query, "range scan")?;
        let start = create_composite_key(object_type, attributes)?;
        let mut end = start.clone();
        end.push(MAX_UNICODE_RUNE);

        let entries: Vec<QueryResult> = self
            .ledger
            .state
            .range(start..end)
            .map(|(key, value)| QueryResult {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        Ok(Box::new(self.ledger.open_cursor(entries)))
    }
}

/// Snapshot cursor. Not closed on drop, so a forgotten close stays visible
/// in [`MemoryLedger::open_cursors`].
struct MemoryCursor<T> {
    entries: VecDeque<T>,
    open: Option<Arc<AtomicUsize>>,
    fail_after: Option<usize>,
    yielded: usize,
}

impl<T> LedgerCursor for MemoryCursor<T> {
    type Item = T;

    fn has_next(&self) -> bool {
        self.open.is_some() && !self.entries.is_empty()
    }

    fn next_entry(&mut self) -> LedgerResult<T> {
        if self.open.is_none() {
            return Err(LedgerError::CursorClosed);
        }
        if self.fail_after == Some(self.yielded) {
            return Err(LedgerError::Io("injected cursor failure".to_string()));
        }
        let entry = self.entries.pop_front().ok_or(LedgerError::CursorExhausted)?;
        self.yielded += 1;
        Ok(entry)
    }

    fn close(&mut self) -> LedgerResult<()> {
        if let Some(counter) = self.open.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
