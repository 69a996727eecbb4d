//! Role-based access checks
//!
//! A gate only ever receives an [`Identity`], so it cannot be evaluated for a
//! request that has not been authenticated.

use crate::auth::middleware::{Authenticator, Identity};
use crate::auth::models::Role;
use crate::error::{Error, Result};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::sync::Arc;

/// Require the identity to hold exactly `required`
pub fn authorize(identity: &Identity, required: Role) -> Result<()> {
    if identity.role() == required {
        return Ok(());
    }

    tracing::warn!(
        user_id = identity.user_id(),
        role = %identity.role(),
        required = %required,
        "Role check failed"
    );
    Err(Error::Forbidden(match required {
        Role::Admin => "Admin access required",
        Role::User => "User access required",
    }))
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub Identity);

impl<S> FromRequestParts<S> for AdminOnly
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let identity = Identity::from_request_parts(parts, state).await?;
        authorize(&identity, Role::Admin)?;
        Ok(AdminOnly(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::User;
    use chrono::Utc;

    fn identity(role: Role) -> Identity {
        let now = Utc::now();
        Identity::new(User {
            id: 1,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn test_admin_is_admitted() {
        assert!(authorize(&identity(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn test_user_is_forbidden() {
        let result = authorize(&identity(Role::User), Role::Admin);
        assert!(matches!(result, Err(Error::Forbidden("Admin access required"))));
    }

    #[test]
    fn test_roles_match_exactly() {
        assert!(authorize(&identity(Role::Admin), Role::User).is_err());
    }
}
