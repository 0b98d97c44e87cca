// handlers/protected/mod.rs - Protected handlers (session cookie required)
//
// Every route in this tier runs behind middleware::session_auth_middleware,
// which rejects the request before it gets here unless a valid session
// cookie resolved to a user identity.

pub mod auth;
pub mod post;
