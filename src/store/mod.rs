//! Namespaced document store
//!
//! Generic ledger-access primitives that any document type can build on:
//!
//! - [`Namespace`]: prefixed get/put/delete
//! - [`CompositeIndex`]: marker-style secondary indexes
//! - [`query_all`] / [`query_one`]: predicate queries over [`Selector`]s
//! - [`history_of`]: per-key mutation history
//!
//! Every host cursor opened here is held by a [`CursorGuard`] and closed
//! on all exit paths.

mod accessor;
mod cursor;
mod errors;
mod history;
mod index;
mod query;
mod selector;

pub use accessor::{get_doc, put_doc, Namespace};
pub use cursor::CursorGuard;
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use history::{format_timestamp, history_of, history_records, HistoryRecord};
pub use index::{CompositeIndex, INDEX_SENTINEL};
pub use query::{query_all, query_all_raw, query_one, query_one_raw};
pub use selector::{Selector, DOC_TYPE_FIELD};
