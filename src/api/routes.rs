//! API route handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::server::AppState;
use crate::auth::models::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User, UserId,
};
use crate::auth::{AdminOnly, Identity};
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection);
            Err(Error::BadRequest("Invalid request body"))
        }
    }
}

fn user_id(raw: &str) -> Result<UserId> {
    raw.parse().map_err(|_| Error::BadRequest("Invalid user ID"))
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// Auth routes

pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let req = json_body(payload)?;
    let (user, token) = state.auth.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Registration successful",
            AuthResponse { user, token },
        )),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    let req = json_body(payload)?;
    let (user, token) = state.auth.login(req).await?;

    Ok(Json(ApiResponse::ok(
        "Login successful",
        AuthResponse { user, token },
    )))
}

// Authenticated routes

pub async fn profile(identity: Identity) -> Json<ApiResponse<User>> {
    Json(ApiResponse::ok("Profile retrieved", identity.into_user()))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::ok("Users retrieved", users)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>> {
    let user = state.users.get(user_id(&id)?).await?;
    Ok(Json(ApiResponse::ok("User retrieved", user)))
}

pub async fn update_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>> {
    let id = user_id(&id)?;
    let req = json_body(payload)?;
    let user = state.users.update(id, req).await?;

    tracing::debug!(actor = identity.user_id(), user_id = id, "User updated via API");
    Ok(Json(ApiResponse::ok("User updated", user)))
}

pub async fn delete_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = user_id(&id)?;
    state.users.delete(id).await?;

    tracing::info!(actor = admin.user_id(), user_id = id, "User deleted via API");
    Ok(Json(ApiResponse::empty("User deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parsing() {
        assert_eq!(user_id("42").unwrap(), 42);
        assert!(matches!(user_id("abc"), Err(Error::BadRequest(_))));
        assert!(matches!(user_id("-1"), Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_empty_response_serializes_null_data() {
        let value = serde_json::to_value(ApiResponse::empty("User deleted")).unwrap();
        assert_eq!(value["success"], true);
        assert!(value["data"].is_null());
    }
}
