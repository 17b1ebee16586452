//! Invocation surface for ledgerdoc
//!
//! Named functions with flat string arguments, answered with a
//! `{code, data, error}` envelope.
//!
//! # Supported Functions
//!
//! - Init, Read
//! - InitUserInfo, ReadUserInfo, ChangeUserInfo, DeleteUserInfo
//! - QueryUserInfoByStatus, GetHistoryForUserInfo
//! - FindUserInfoByStatusAndEmail, ListUserEmailsByStatus, CheckUserPwd

mod args;
mod chaincode;
mod handler;
mod response;

pub use args::positional;
pub use chaincode::{Chaincode, INIT_FUNCTION, READ_FUNCTION};
pub use handler::{
    Handler, InitHandler, ReadHandler, UserInfoHandler, UserInfoOp, APP_VERSION_KEY, SELFTEST_KEY,
};
pub use response::{
    error_response, service_error_response, success_response, Envelope, PeerResponse,
    ResponseCode, STATUS_ERROR, STATUS_OK,
};
