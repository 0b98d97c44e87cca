// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Session acquisition endpoints: registration and login. Everything else
// sits behind the session guard.

pub mod auth;

pub use auth::*;
