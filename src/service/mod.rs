//! Document services
//!
//! Typed business operations composed from the store primitives.
//! Positional argument handling lives in the API layer.

mod errors;
mod status;
mod user_info;

pub use errors::{ServiceError, ServiceResult};
pub use status::DocStatus;
pub use user_info::{
    UserInfo, UserInfoService, DOC_TYPE_USER_INFO, IDX_FIELD_USER_STATUS,
    IDX_USER_STATUS_2_USER_EMAIL, PK_FIELD_USER_INFO,
};
