//! User account management

use std::sync::Arc;

use super::validation;
use crate::auth::models::{NewUser, RegisterRequest, Role, UpdateUserRequest, User, UserId};
use crate::auth::password::PasswordHasher;
use crate::error::{Error, Result};
use crate::store::{StoreError, UserStore};

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Validate, hash and insert a new account with the given role.
    ///
    /// Duplicate emails are detected by the store on insert.
    pub async fn create(&self, req: RegisterRequest, role: Role) -> Result<User> {
        validation::validate_register(&req)?;

        let hasher = self.hasher;
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .store
            .create(NewUser {
                name: req.name.trim().to_string(),
                email: req.email.trim().to_string(),
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn create_admin(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let req = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.create(req, Role::Admin).await
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn update(&self, id: UserId, req: UpdateUserRequest) -> Result<User> {
        validation::validate_update(&req)?;

        let mut user = self.store.find_by_id(id).await?;
        if let Some(name) = req.name.filter(|n| !n.is_empty()) {
            user.name = name.trim().to_string();
        }
        if let Some(email) = req.email.filter(|e| !e.is_empty()) {
            user.email = email.trim().to_string();
        }

        let user = self.store.update(&user).await?;
        tracing::info!(user_id = user.id, "Updated user");
        Ok(user)
    }

    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }

    pub async fn set_role(&self, email: &str, role: Role) -> Result<User> {
        let mut user = match self.store.find_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(Error::NotFound("User not found")),
            Err(e) => return Err(e.into()),
        };
        user.role = role;

        let user = self.store.update(&user).await?;
        tracing::info!(user_id = user.id, role = %user.role, "Changed user role");
        Ok(user)
    }
}
