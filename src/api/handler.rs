//! Invocation handlers
//!
//! One handler per exposed function. A handler validates its positional
//! arguments, calls into the service layer, and the default `handle`
//! folds the outcome into a response envelope.

use std::sync::Arc;

use crate::ledger::LedgerStub;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::service::{ServiceError, ServiceResult, UserInfoService};
use crate::store;

use super::args::positional;
use super::response::{service_error_response, success_response, PeerResponse};

/// A named chaincode function
pub trait Handler: Send + Sync {
    /// Run the function. `Some` bytes must be a JSON document.
    fn call(&self, stub: &mut dyn LedgerStub, args: &[String]) -> ServiceResult<Option<Vec<u8>>>;

    fn handle(&self, stub: &mut dyn LedgerStub, args: &[String]) -> PeerResponse {
        match self.call(stub, args) {
            Ok(data) => success_response(data.as_deref()),
            Err(e) => service_error_response(&e),
        }
    }
}

/// Key of the application version marker
pub const APP_VERSION_KEY: &str = "demo_ui";
/// Key of the self-test marker
pub const SELFTEST_KEY: &str = "selftest";

/// `Init [seed]`: writes the version and self-test markers
pub struct InitHandler {
    app_version: String,
}

impl InitHandler {
    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
        }
    }
}

impl Handler for InitHandler {
    fn call(&self, stub: &mut dyn LedgerStub, args: &[String]) -> ServiceResult<Option<Vec<u8>>> {
        log_event(Event::InitStart);

        let [seed] = positional::<1>(args, "1")?;
        let seed: i64 = seed.parse().map_err(|_| {
            ServiceError::InvalidArgument("Expecting a numeric string argument to Init()".into())
        })?;

        store::put_doc(stub, APP_VERSION_KEY, self.app_version.as_bytes())?;
        store::put_doc(stub, SELFTEST_KEY, seed.to_string().as_bytes())?;

        log_event_with_fields(Event::InitComplete, &[("app_version", self.app_version.as_str())]);
        Ok(None)
    }
}

/// `Read [key]`: raw state read, absent keys answer with empty data
pub struct ReadHandler;

impl Handler for ReadHandler {
    fn call(&self, stub: &mut dyn LedgerStub, args: &[String]) -> ServiceResult<Option<Vec<u8>>> {
        let [key] = positional::<1>(args, "key of the var to query")?;
        Ok(store::get_doc(stub, key)?)
    }
}

/// UserInfo functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInfoOp {
    Init,
    Read,
    Change,
    Delete,
    QueryByStatus,
    History,
    FindByStatusAndEmail,
    ListEmailsByStatus,
    CheckPwd,
}

impl UserInfoOp {
    pub const ALL: [UserInfoOp; 9] = [
        UserInfoOp::Init,
        UserInfoOp::Read,
        UserInfoOp::Change,
        UserInfoOp::Delete,
        UserInfoOp::QueryByStatus,
        UserInfoOp::History,
        UserInfoOp::FindByStatusAndEmail,
        UserInfoOp::ListEmailsByStatus,
        UserInfoOp::CheckPwd,
    ];

    /// Exposed function name
    pub fn function_name(&self) -> &'static str {
        match self {
            UserInfoOp::Init => "InitUserInfo",
            UserInfoOp::Read => "ReadUserInfo",
            UserInfoOp::Change => "ChangeUserInfo",
            UserInfoOp::Delete => "DeleteUserInfo",
            UserInfoOp::QueryByStatus => "QueryUserInfoByStatus",
            UserInfoOp::History => "GetHistoryForUserInfo",
            UserInfoOp::FindByStatusAndEmail => "FindUserInfoByStatusAndEmail",
            UserInfoOp::ListEmailsByStatus => "ListUserEmailsByStatus",
            UserInfoOp::CheckPwd => "CheckUserPwd",
        }
    }
}

/// Dispatches one UserInfo function to the shared service
pub struct UserInfoHandler {
    service: Arc<UserInfoService>,
    op: UserInfoOp,
}

impl UserInfoHandler {
    pub fn new(service: Arc<UserInfoService>, op: UserInfoOp) -> Self {
        Self { service, op }
    }
}

impl Handler for UserInfoHandler {
    fn call(&self, stub: &mut dyn LedgerStub, args: &[String]) -> ServiceResult<Option<Vec<u8>>> {
        let svc = &self.service;
        match self.op {
            UserInfoOp::Init => {
                let [email, nickname, pwd_hash] = positional::<3>(args, "3")?;
                svc.init_user_info(stub, email, nickname, pwd_hash)?;
                Ok(None)
            }
            UserInfoOp::Read => {
                let [email] = positional::<1>(args, "UserEmail")?;
                svc.read_user_info(stub, email).map(Some)
            }
            UserInfoOp::Change => {
                let [email, nickname, pwd_hash] = positional::<3>(args, "3")?;
                svc.change_user_info(stub, email, nickname, pwd_hash)?;
                Ok(None)
            }
            UserInfoOp::Delete => {
                let [email] = positional::<1>(args, "1")?;
                svc.delete_user_info(stub, email)?;
                Ok(None)
            }
            UserInfoOp::QueryByStatus => {
                let [status] = positional::<1>(args, "owner_status")?;
                svc.query_by_status(stub, status).map(Some)
            }
            UserInfoOp::History => {
                let [email] = positional::<1>(args, "userEmail")?;
                svc.history(stub, email).map(Some)
            }
            UserInfoOp::FindByStatusAndEmail => {
                let [status, email] = positional::<2>(args, "userStatus and userEmail")?;
                svc.find_by_status_and_email(stub, status, email).map(Some)
            }
            UserInfoOp::ListEmailsByStatus => {
                let [status] = positional::<1>(args, "userStatus")?;
                let emails = svc.list_emails_by_status(stub, status)?;
                Ok(Some(serde_json::to_vec(&emails)?))
            }
            UserInfoOp::CheckPwd => {
                let [email, password] = positional::<2>(args, "userEmail and password")?;
                svc.check_pwd(stub, email, password).map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ledger::{Fault, MemoryLedger};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_init_writes_markers() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        let resp = InitHandler::new("1.0").handle(&mut tx, &strings(&["42"]));
        assert!(resp.is_ok());
        tx.commit();

        assert_eq!(ledger.state(APP_VERSION_KEY), Some(&b"1.0"[..]));
        assert_eq!(ledger.state(SELFTEST_KEY), Some(&b"42"[..]));
    }

    #[test]
    fn test_init_rejects_non_numeric_seed() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        let resp = InitHandler::new("1.0").handle(&mut tx, &strings(&["abc"]));
        let envelope = resp.envelope().unwrap();
        assert_eq!(envelope.code, "2000");
        assert_eq!(envelope.error, "Expecting a numeric string argument to Init()");
        assert_eq!(tx.pending_writes(), 0);
    }

    #[test]
    fn test_read_absent_key_is_empty_success() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        let envelope = ReadHandler.handle(&mut tx, &strings(&["nope"])).envelope().unwrap();
        assert_eq!(envelope.code, "1000");
        assert_eq!(envelope.data, serde_json::json!(""));
    }

    #[test]
    fn test_storage_fault_is_system_error() {
        let mut ledger = MemoryLedger::new();
        ledger.inject(Fault::Get);
        let service = Arc::new(UserInfoService::new(&Config::default()));
        let handler = UserInfoHandler::new(service, UserInfoOp::Read);

        let mut tx = ledger.begin();
        let envelope = handler.handle(&mut tx, &strings(&["a@b.c"])).envelope().unwrap();
        assert_eq!(envelope.code, "9999");
    }

    #[test]
    fn test_function_names_are_unique() {
        let mut names: Vec<_> = UserInfoOp::ALL.iter().map(|op| op.function_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), UserInfoOp::ALL.len());
    }
}
