//! History reconstruction
//!
//! Replays the host change log of one key into an ordered list of
//! `{txId, dataValue, timestamp, isDelete}` records, oldest first.
//! Deletes carry a literal `null` value; `isDelete` is the string
//! `"true"` or `"false"`.

use chrono::DateTime;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::ledger::{KeyModification, LedgerStub, LedgerTimestamp};
use crate::observability::{log_event_with_fields, Event};

use super::accessor::Namespace;
use super::cursor::CursorGuard;
use super::errors::{StoreError, StoreResult};
use super::query::raw_json;

/// One committed mutation of a document
#[derive(Debug, Serialize)]
pub struct HistoryRecord {
    #[serde(rename = "txId")]
    pub tx_id: String,
    #[serde(rename = "dataValue")]
    pub data_value: Box<RawValue>,
    pub timestamp: String,
    #[serde(rename = "isDelete")]
    pub is_delete: String,
}

impl HistoryRecord {
    fn from_modification(modification: KeyModification) -> StoreResult<Self> {
        let data_value = if modification.is_delete {
            raw_json(b"null".to_vec())?
        } else {
            raw_json(modification.value)?
        };

        Ok(Self {
            tx_id: modification.tx_id,
            data_value,
            timestamp: format_timestamp(modification.timestamp)?,
            is_delete: modification.is_delete.to_string(),
        })
    }

    pub fn is_delete(&self) -> bool {
        self.is_delete == "true"
    }
}

/// Render a host timestamp as `YYYY-MM-DD HH:MM:SS[.fraction] +0000 UTC`
pub fn format_timestamp(ts: LedgerTimestamp) -> StoreResult<String> {
    let nanos = u32::try_from(ts.nanos)
        .map_err(|_| StoreError::serialization(format!("negative nanos in timestamp: {}", ts.nanos)))?;
    let datetime = DateTime::from_timestamp(ts.seconds, nanos).ok_or_else(|| {
        StoreError::serialization(format!("timestamp out of range: {}s", ts.seconds))
    })?;
    let mut out = datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    if nanos != 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push_str(" +0000 UTC");
    Ok(out)
}

/// Ordered mutation records for `namespace + key`
pub fn history_records(
    stub: &dyn LedgerStub,
    namespace: &Namespace,
    key: &str,
) -> StoreResult<Vec<HistoryRecord>> {
    if key.is_empty() {
        return Err(StoreError::empty_key("docKey"));
    }

    let physical = namespace.key(key);
    log_event_with_fields(Event::HistoryBegin, &[("key", physical.as_str())]);

    let mut cursor = CursorGuard::new(stub.get_history_for_key(&physical)?);
    let mut records = Vec::new();
    while cursor.has_next() {
        let modification = cursor.next_entry()?;
        records.push(HistoryRecord::from_modification(modification)?);
    }
    cursor.close()?;

    log_event_with_fields(
        Event::HistoryComplete,
        &[("key", physical.as_str()), ("records", records.len().to_string().as_str())],
    );
    Ok(records)
}

/// History of `namespace + key` as a JSON array buffer
pub fn history_of(stub: &dyn LedgerStub, namespace: &Namespace, key: &str) -> StoreResult<Vec<u8>> {
    let records = history_records(stub, namespace, key)?;
    Ok(serde_json::to_vec(&records)?)
}
