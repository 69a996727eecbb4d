//! Authentication middleware and extractors
//!
//! A request passes through these states, and any failure ends it:
//!
//! ```text
//! header present -> token extracted -> claims verified -> user loaded -> identity attached
//! ```
//!
//! Callers only ever see "missing" or "invalid" credentials; the precise
//! verification failure is logged.

use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{Role, User, UserId};
use crate::error::{Error, Result};
use crate::store::{StoreError, UserStore};
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

const INVALID_TOKEN: &str = "Invalid or expired token";
const UNKNOWN_USER: &str = "User not found";

/// The authenticated caller of a request.
///
/// Built only from a verified token and a freshly loaded user row, so role and
/// id always reflect the stored account rather than the token's claims.
#[derive(Debug, Clone)]
pub struct Identity {
    user: User,
}

impl Identity {
    pub(crate) fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn into_user(self) -> User {
        self.user
    }
}

/// Resolves bearer tokens to identities
pub struct Authenticator {
    tokens: Arc<TokenIssuer>,
    store: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenIssuer>, store: Arc<dyn UserStore>) -> Self {
        Self { tokens, store }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity> {
        let token = bearer_token(headers)?;

        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::warn!(reason = %e, "Rejected bearer token");
            Error::InvalidCredentials(INVALID_TOKEN)
        })?;

        // The account may have been deleted since the token was issued
        let user = match self.store.find_by_id(claims.user_id).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                tracing::warn!(user_id = claims.user_id, "Token refers to a missing user");
                return Err(Error::InvalidCredentials(UNKNOWN_USER));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Identity::new(user))
    }
}

/// Pull the token out of the Authorization header.
///
/// A leading "Bearer " is stripped when present; a bare token is accepted as is.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(Error::MissingCredentials)?
        .to_str()
        .map_err(|_| Error::InvalidCredentials(INVALID_TOKEN))?;

    if value.is_empty() {
        return Err(Error::MissingCredentials);
    }

    Ok(value.strip_prefix("Bearer ").unwrap_or(value))
}

/// Middleware for requiring authentication
pub async fn require_identity(
    State(auth): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    let identity = auth.authenticate(req.headers()).await?;
    tracing::debug!(user_id = identity.user_id(), role = %identity.role(), "Authenticated request");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for Identity
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(identity.clone());
        }

        // Route without the middleware layer: resolve here instead
        let auth = Arc::<Authenticator>::from_ref(state);
        let identity = auth.authenticate(&parts.headers).await?;
        parts.extensions.insert(identity.clone());
        Ok(identity)
    }
}
