//! Host ledger interface
//!
//! The document store is a pure client of the host ledger. This module
//! defines the surface it consumes and an in-memory host used by tests
//! and the CLI harness.
//!
//! # Host contract
//!
//! - `get_state` / `put_state` / `del_state` by key
//! - `get_query_result` over JSON equality selectors
//! - `get_history_for_key` yielding committed mutations oldest first
//! - composite keys for marker-style secondary indexes
//!
//! Cursors returned by the host are resources: whoever opens one must
//! close it on every exit path.

mod composite;
mod errors;
mod filter;
mod memory;
mod stub;

pub use composite::{
    create_composite_key, split_composite_key, COMPOSITE_KEY_NAMESPACE, MAX_UNICODE_RUNE,
};
pub use errors::{LedgerError, LedgerResult};
pub use filter::SelectorFilter;
pub use memory::{Fault, MemoryLedger, MemoryTransaction};
pub use stub::{
    HistoryCursor, KeyModification, LedgerCursor, LedgerStub, LedgerTimestamp, QueryResult,
    StateCursor,
};
