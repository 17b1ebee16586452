//! Function dispatch
//!
//! The dispatch table is built once from configuration and maps each
//! exposed function name to its handler.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};
use crate::service::UserInfoService;

use super::handler::{Handler, InitHandler, ReadHandler, UserInfoHandler, UserInfoOp};
use super::response::{error_response, PeerResponse, ResponseCode};

/// Name of the initialization function
pub const INIT_FUNCTION: &str = "Init";
/// Name of the raw read function
pub const READ_FUNCTION: &str = "Read";

/// Chaincode entry points
pub struct Chaincode {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Chaincode {
    pub fn new(config: &Config) -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        handlers.insert(INIT_FUNCTION, Box::new(InitHandler::new(config.app_version.clone())));
        handlers.insert(READ_FUNCTION, Box::new(ReadHandler));

        let users = Arc::new(UserInfoService::new(config));
        for op in UserInfoOp::ALL {
            handlers.insert(
                op.function_name(),
                Box::new(UserInfoHandler::new(Arc::clone(&users), op)),
            );
        }

        Self { handlers }
    }

    /// Host initialization call
    pub fn init(&self, stub: &mut dyn LedgerStub, args: &[String]) -> PeerResponse {
        self.invoke(stub, INIT_FUNCTION, args)
    }

    /// Route a named invocation to its handler
    pub fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[String]) -> PeerResponse {
        log_event_with_fields(
            Event::InvokeReceived,
            &[("function", function), ("tx_id", stub.tx_id())],
        );

        match self.handlers.get(function) {
            Some(handler) => handler.handle(stub, args),
            None => {
                log_event_with_fields(Event::UnknownFunction, &[("function", function)]);
                error_response(ResponseCode::ArgumentError, "Received unknown function invocation")
            }
        }
    }

    /// Registered function names, sorted
    pub fn functions(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    #[test]
    fn test_all_functions_registered() {
        let chaincode = Chaincode::new(&Config::default());
        assert_eq!(
            chaincode.functions(),
            vec![
                "ChangeUserInfo",
                "CheckUserPwd",
                "DeleteUserInfo",
                "FindUserInfoByStatusAndEmail",
                "GetHistoryForUserInfo",
                "Init",
                "InitUserInfo",
                "ListUserEmailsByStatus",
                "QueryUserInfoByStatus",
                "Read",
                "ReadUserInfo",
            ]
        );
    }

    #[test]
    fn test_init_entry_point_writes_markers() {
        let chaincode = Chaincode::new(&Config {
            app_version: "3.2".into(),
            ..Config::default()
        });
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        assert!(chaincode.init(&mut tx, &["5".to_string()]).is_ok());
        tx.commit();

        assert_eq!(ledger.state("demo_ui"), Some(&b"3.2"[..]));
        assert_eq!(ledger.state("selftest"), Some(&b"5"[..]));
    }

    #[test]
    fn test_unknown_function() {
        let chaincode = Chaincode::new(&Config::default());
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        let envelope = chaincode
            .invoke(&mut tx, "Nope", &[])
            .envelope()
            .unwrap();
        assert_eq!(envelope.code, "2000");
        assert_eq!(envelope.error, "Received unknown function invocation");
    }
}
