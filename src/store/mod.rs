//! Credential store: persistence of user accounts
//!
//! The store is the authority on email uniqueness. `create` and `update` report
//! a duplicate email as [`StoreError::Conflict`]; callers should not rely on a
//! separate existence check beforehand.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::models::{NewUser, User, UserId};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("email already in use")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<User>;

    /// All users ordered by id
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Insert a user; the store assigns id and timestamps
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Persist name, email and role of an existing user and bump `updated_at`
    async fn update(&self, user: &User) -> StoreResult<User>;

    async fn delete(&self, id: UserId) -> StoreResult<()>;
}
