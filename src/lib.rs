//! ledgerdoc - document chaincode over a key-value ledger
//!
//! Layers, bottom up:
//! - `ledger`: host stub interface and an in-memory host
//! - `store`: namespaced access, composite indexes, queries, history
//! - `service`: UserInfo document operations
//! - `api`: function dispatch and response envelopes

pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod ledger;
pub mod observability;
pub mod service;
pub mod store;
