pub mod auth;
pub mod response;

pub use auth::{session_auth_middleware, AuthUser};
pub use response::{ApiMessage, ApiResponse, ApiResult};
