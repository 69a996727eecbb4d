//! Registration and login

use std::sync::Arc;

use super::users::UserService;
use super::validation;
use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{LoginRequest, RegisterRequest, Role, User};
use crate::auth::password::PasswordHasher;
use crate::error::{Error, Result};
use crate::store::{StoreError, UserStore};

const BAD_LOGIN: &str = "Invalid credentials";

pub struct AuthService {
    users: Arc<UserService>,
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenIssuer>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        users: Arc<UserService>,
        store: Arc<dyn UserStore>,
        tokens: Arc<TokenIssuer>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            store,
            tokens,
            hasher,
        }
    }

    /// Create a regular account and sign a token for it
    pub async fn register(&self, req: RegisterRequest) -> Result<(User, String)> {
        let user = self.users.create(req, Role::User).await?;
        let token = self.tokens.issue(&user)?;
        Ok((user, token))
    }

    /// Check email and password and sign a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, req: LoginRequest) -> Result<(User, String)> {
        validation::validate_login(&req)?;

        let user = match self.store.find_by_email(req.email.trim()).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                tracing::info!("Login attempt for unknown email");
                return Err(Error::InvalidCredentials(BAD_LOGIN));
            }
            Err(e) => return Err(e.into()),
        };

        let hasher = self.hasher;
        let password = req.password;
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await?;
        if !matches {
            tracing::info!(user_id = user.id, "Login attempt with wrong password");
            return Err(Error::InvalidCredentials(BAD_LOGIN));
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::store::MemoryStore;

    fn service() -> AuthService {
        let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
        let hasher = PasswordHasher::new(4);
        let tokens = Arc::new(TokenIssuer::new(AuthConfig {
            jwt_secret: "auth-service-test".to_string(),
            ..AuthConfig::default()
        }));
        let users = Arc::new(UserService::new(store.clone(), hasher));
        AuthService::new(users, store, tokens, hasher)
    }

    fn register() -> RegisterRequest {
        RegisterRequest {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            email: "ann@x.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();
        let (user, token) = service.register(register()).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!token.is_empty());

        let (logged_in, _) = service.login(login("secret1")).await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let service = service();
        service.register(register()).await.unwrap();

        let wrong = service.login(login("secret2")).await.unwrap_err();
        let unknown = service
            .login(LoginRequest {
                email: "bob@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, Error::InvalidCredentials(_)));
    }
}
