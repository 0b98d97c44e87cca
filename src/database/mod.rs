pub mod manager;
pub mod models;
pub mod posts;
pub mod users;

pub use manager::DatabaseError;
pub use posts::Posts;
pub use users::Users;
