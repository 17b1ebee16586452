//! UserInfo document service
//!
//! Business operations over UserInfo documents keyed by email:
//! create, read, change, soft delete, status queries and history.
//!
//! Uniqueness at creation is a read-before-write check; concurrent
//! creators are separated by the host's commit-time conflict detection.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{Config, IndexMaintenance};
use crate::crypto;
use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};
use crate::store::{self, CompositeIndex, Namespace, Selector};

use super::errors::{ServiceError, ServiceResult};
use super::status::DocStatus;

/// `docType` of UserInfo documents
pub const DOC_TYPE_USER_INFO: &str = "userInfo";
/// Primary key field
pub const PK_FIELD_USER_INFO: &str = "userEmail";
/// Indexed status field
pub const IDX_FIELD_USER_STATUS: &str = "userStatus";
/// Composite index mapping status to email
pub const IDX_USER_STATUS_2_USER_EMAIL: &str = "userStatus_2_userEmail";

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub doc_type: String,
    pub user_email: String,
    pub user_nickname: String,
    pub user_pwd_hash: String,
    pub user_status: DocStatus,
}

impl UserInfo {
    pub fn new(email: &str, nickname: &str, pwd_hash: &str) -> Self {
        Self {
            doc_type: DOC_TYPE_USER_INFO.to_string(),
            user_email: email.to_string(),
            user_nickname: nickname.to_string(),
            user_pwd_hash: pwd_hash.to_string(),
            user_status: DocStatus::Init,
        }
    }
}

/// Stateless UserInfo operations
#[derive(Debug, Clone)]
pub struct UserInfoService {
    namespace: Namespace,
    status_index: CompositeIndex,
    index_maintenance: IndexMaintenance,
}

impl UserInfoService {
    pub fn new(config: &Config) -> Self {
        let namespace = Namespace::new(config.user_namespace.clone());
        Self {
            status_index: CompositeIndex::new(namespace.clone(), IDX_USER_STATUS_2_USER_EMAIL),
            namespace,
            index_maintenance: config.index_maintenance,
        }
    }

    /// Create a user with status `00` and index it by status
    pub fn init_user_info(
        &self,
        stub: &mut dyn LedgerStub,
        email: &str,
        nickname: &str,
        pwd_hash: &str,
    ) -> ServiceResult<()> {
        if self.namespace.get(stub, email)?.is_some() {
            return Err(ServiceError::AlreadyExists(format!(
                "This UserInfo already exists: {}",
                email
            )));
        }

        let user = UserInfo::new(email, nickname, pwd_hash);
        let index_values = [user.user_status.as_str(), user.user_email.as_str()];
        // Key encoding can reject the email; fail before anything is buffered.
        self.status_index.key(stub, &index_values)?;

        self.persist(stub, &user)?;
        self.status_index.create(stub, &index_values)?;
        Ok(())
    }

    /// Raw stored bytes of a user
    pub fn read_user_info(&self, stub: &dyn LedgerStub, email: &str) -> ServiceResult<Vec<u8>> {
        self.namespace
            .get(stub, email)?
            .ok_or_else(|| ServiceError::NotFound(format!("UserInfo does not exist: {}", email)))
    }

    /// Decoded user
    pub fn load(&self, stub: &dyn LedgerStub, email: &str) -> ServiceResult<UserInfo> {
        let bytes = self.read_user_info(stub, email)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Update nickname and password hash. Returns whether anything was written.
    pub fn change_user_info(
        &self,
        stub: &mut dyn LedgerStub,
        email: &str,
        nickname: &str,
        pwd_hash: &str,
    ) -> ServiceResult<bool> {
        let mut user = self.load(stub, email)?;

        let mut changed = false;
        if user.user_nickname != nickname {
            user.user_nickname = nickname.to_string();
            changed = true;
        }
        if user.user_pwd_hash != pwd_hash {
            user.user_pwd_hash = pwd_hash.to_string();
            changed = true;
        }

        if !changed {
            log_event_with_fields(Event::DocumentUnchanged, &[("key", email)]);
            return Ok(false);
        }

        self.persist(stub, &user)?;
        Ok(true)
    }

    /// Soft delete. Returns whether anything was written.
    pub fn delete_user_info(&self, stub: &mut dyn LedgerStub, email: &str) -> ServiceResult<bool> {
        let mut user = self.load(stub, email)?;

        if user.user_status.is_terminal() {
            log_event_with_fields(Event::DocumentUnchanged, &[("key", email), ("reason", "already deleted")]);
            return Ok(false);
        }

        let previous = user.user_status;
        user.user_status = DocStatus::Niled;
        self.persist(stub, &user)?;
        self.move_status_index(stub, email, previous, user.user_status)?;
        Ok(true)
    }

    /// Users whose live status equals `status`, as a JSON array
    pub fn query_by_status(&self, stub: &dyn LedgerStub, status: &str) -> ServiceResult<Vec<u8>> {
        let selector = Selector::doc_type(DOC_TYPE_USER_INFO).field(IDX_FIELD_USER_STATUS, status);
        Ok(store::query_all(stub, &selector)?)
    }

    /// The one user with the given status and email
    pub fn find_by_status_and_email(
        &self,
        stub: &dyn LedgerStub,
        status: &str,
        email: &str,
    ) -> ServiceResult<Vec<u8>> {
        let selector = Selector::doc_type(DOC_TYPE_USER_INFO)
            .field(IDX_FIELD_USER_STATUS, status)
            .field(PK_FIELD_USER_INFO, email);
        store::query_one(stub, &selector)?.ok_or_else(|| {
            ServiceError::NotFound(format!(
                "No UserInfo with status {} and email {}",
                status, email
            ))
        })
    }

    /// Emails recorded under `status` in the status index, in key order
    pub fn list_emails_by_status(
        &self,
        stub: &dyn LedgerStub,
        status: &str,
    ) -> ServiceResult<Vec<String>> {
        let tuples = self.status_index.list(stub, &[status])?;
        Ok(tuples
            .into_iter()
            .filter_map(|mut attrs| if attrs.len() == 2 { attrs.pop() } else { None })
            .collect())
    }

    /// Mutation history of a user as a JSON array
    pub fn history(&self, stub: &dyn LedgerStub, email: &str) -> ServiceResult<Vec<u8>> {
        Ok(store::history_of(stub, &self.namespace, email)?)
    }

    /// Check `password` against the stored base64 SHA-256 hash
    pub fn check_pwd(&self, stub: &dyn LedgerStub, email: &str, password: &str) -> ServiceResult<Vec<u8>> {
        let user = self.load(stub, email)?;
        let matched = crypto::check_sha256(password, &user.user_pwd_hash);
        Ok(serde_json::to_vec(&json!({ "matched": matched }))?)
    }

    fn persist(&self, stub: &mut dyn LedgerStub, user: &UserInfo) -> ServiceResult<()> {
        let bytes = serde_json::to_vec(user)?;
        self.namespace.put(stub, &user.user_email, &bytes)?;
        log_event_with_fields(
            Event::DocumentWritten,
            &[("key", user.user_email.as_str()), ("status", user.user_status.as_str())],
        );
        Ok(())
    }

    fn move_status_index(
        &self,
        stub: &mut dyn LedgerStub,
        email: &str,
        from: DocStatus,
        to: DocStatus,
    ) -> ServiceResult<()> {
        if self.index_maintenance == IndexMaintenance::Compat || from == to {
            return Ok(());
        }
        self.status_index.remove(stub, &[from.as_str(), email])?;
        self.status_index.create(stub, &[to.as_str(), email])?;
        Ok(())
    }
}
