//! Namespaced key-value access
//!
//! A namespace is a plain string prefix glued onto the logical key with
//! no separator. Namespaces must be chosen so that none is a prefix of
//! another's keys; nothing here enforces it.
//!
//! Host failures propagate unchanged. No retries.

use crate::ledger::LedgerStub;

use super::errors::StoreResult;

/// A key prefix separating one document type from the others
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// The empty namespace; keys are used as given
    pub fn root() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Physical key for a logical key
    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.0, key)
    }

    /// Read a document. `None` when the key is absent.
    pub fn get(&self, stub: &dyn LedgerStub, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(stub.get_state(&self.key(key))?)
    }

    /// Write a document
    pub fn put(&self, stub: &mut dyn LedgerStub, key: &str, bytes: &[u8]) -> StoreResult<()> {
        stub.put_state(&self.key(key), bytes)?;
        Ok(())
    }

    /// Remove a key at the host
    pub fn delete(&self, stub: &mut dyn LedgerStub, key: &str) -> StoreResult<()> {
        stub.del_state(&self.key(key))?;
        Ok(())
    }
}

/// Read a key with no namespace
pub fn get_doc(stub: &dyn LedgerStub, key: &str) -> StoreResult<Option<Vec<u8>>> {
    Namespace::root().get(stub, key)
}

/// Write a key with no namespace
pub fn put_doc(stub: &mut dyn LedgerStub, key: &str, bytes: &[u8]) -> StoreResult<()> {
    Namespace::root().put(stub, key, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Fault, MemoryLedger};
    use crate::store::StoreErrorCode;

    #[test]
    fn test_prefix_concatenation() {
        let ns = Namespace::new("userInfo_");
        assert_eq!(ns.key("a@b.c"), "userInfo_a@b.c");
        assert_eq!(Namespace::root().key("selftest"), "selftest");
    }

    #[test]
    fn test_put_then_get() {
        let mut ledger = MemoryLedger::new();
        let ns = Namespace::new("ns_");

        let mut tx = ledger.begin();
        ns.put(&mut tx, "k", b"{\"a\":1}").unwrap();
        tx.commit();

        assert_eq!(ledger.state("ns_k"), Some(&b"{\"a\":1}"[..]));
        let tx = ledger.begin();
        assert_eq!(ns.get(&tx, "k").unwrap(), Some(b"{\"a\":1}".to_vec()));
        assert_eq!(ns.get(&tx, "missing").unwrap(), None);
        assert_eq!(get_doc(&tx, "ns_k").unwrap(), Some(b"{\"a\":1}".to_vec()));
    }

    #[test]
    fn test_host_failure_propagates() {
        let mut ledger = MemoryLedger::new();
        ledger.inject(Fault::Put);
        let mut tx = ledger.begin();
        let err = put_doc(&mut tx, "k", b"1").unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::LedgerFailure);
        assert!(err.message().contains("injected put failure"));
    }
}
