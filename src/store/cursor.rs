//! Scoped cursor ownership
//!
//! [`CursorGuard`] owns a host cursor and closes it exactly once: either
//! through [`CursorGuard::close`], which reports close failures, or on
//! drop when an early return or `?` leaves the scope.

use crate::ledger::{LedgerCursor, LedgerError, LedgerResult};
use crate::observability::{log_event_with_fields, Event};

/// Owns an open host cursor until it is closed
pub struct CursorGuard<T> {
    cursor: Option<Box<dyn LedgerCursor<Item = T>>>,
}

impl<T> CursorGuard<T> {
    pub fn new(cursor: Box<dyn LedgerCursor<Item = T>>) -> Self {
        Self {
            cursor: Some(cursor),
        }
    }

    pub fn has_next(&self) -> bool {
        self.cursor.as_ref().map_or(false, |c| c.has_next())
    }

    pub fn next_entry(&mut self) -> LedgerResult<T> {
        match self.cursor.as_mut() {
            Some(c) => c.next_entry(),
            None => Err(LedgerError::CursorClosed),
        }
    }

    /// Close now and surface any close failure
    pub fn close(mut self) -> LedgerResult<()> {
        match self.cursor.take() {
            Some(mut c) => c.close(),
            None => Ok(()),
        }
    }
}

impl<T> Iterator for CursorGuard<T> {
    type Item = LedgerResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            Some(self.next_entry())
        } else {
            None
        }
    }
}

impl<T> Drop for CursorGuard<T> {
    fn drop(&mut self) {
        if let Some(mut c) = self.cursor.take() {
            if let Err(e) = c.close() {
                log_event_with_fields(Event::CursorCloseFailed, &[("error", e.to_string().as_str())]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerStub, MemoryLedger};

    fn ledger_with_history() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        for v in ["1", "2", "3"] {
            let mut tx = ledger.begin();
            tx.put_state("k", v.as_bytes()).unwrap();
            tx.commit();
        }
        ledger
    }

    #[test]
    fn test_explicit_close() {
        let mut ledger = ledger_with_history();
        {
            let tx = ledger.begin();
            let guard = CursorGuard::new(tx.get_history_for_key("k").unwrap());
            guard.close().unwrap();
        }
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_drop_closes_after_early_exit() {
        let mut ledger = ledger_with_history();
        {
            let tx = ledger.begin();
            let mut guard = CursorGuard::new(tx.get_history_for_key("k").unwrap());
            let first = guard.next_entry().unwrap();
            assert_eq!(first.value, b"1");
        }
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_iterates_in_order() {
        let mut ledger = ledger_with_history();
        let tx = ledger.begin();
        let guard = CursorGuard::new(tx.get_history_for_key("k").unwrap());
        let values: Vec<Vec<u8>> = guard.map(|m| m.unwrap().value).collect();
        assert_eq!(values, vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]);
    }
}
