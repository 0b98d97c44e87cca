pub mod create;
pub mod delete;

// Re-export handler functions for use in routing
pub use create::create as post_create;
pub use delete::delete as post_delete;
