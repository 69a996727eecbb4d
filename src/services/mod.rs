//! Application services between the HTTP handlers and the store

pub mod auth;
pub mod users;
pub mod validation;

pub use auth::AuthService;
pub use users::UserService;
