//! HTTP API server

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_identity, Authenticator, Clock, PasswordHasher, SystemClock, TokenIssuer};
use crate::config::{AuthConfig, Config};
use crate::error::Result;
use crate::services::{AuthService, UserService};
use crate::store::UserStore;

use super::routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(config: AuthConfig, store: Arc<dyn UserStore>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Build the state with an explicit time source for token issue and expiry
    pub fn with_clock(config: AuthConfig, store: Arc<dyn UserStore>, clock: Arc<dyn Clock>) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let tokens = Arc::new(TokenIssuer::with_clock(config, clock));
        let users = Arc::new(UserService::new(store.clone(), hasher));
        let auth = Arc::new(AuthService::new(
            users.clone(),
            store.clone(),
            tokens.clone(),
            hasher,
        ));
        let authenticator = Arc::new(Authenticator::new(tokens, store));

        Self {
            auth,
            users,
            authenticator,
        }
    }
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/profile", get(routes::profile))
        .route("/users", get(routes::list_users))
        .route("/users/", get(routes::list_users))
        .route(
            "/users/{id}",
            get(routes::get_user)
                .put(routes::update_user)
                .delete(routes::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            require_identity,
        ));

    let public = Router::new()
        .route("/auth/register", post(routes::register))
        .route("/auth/login", post(routes::login));

    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/v1", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already bound listener until ctrl-c
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Run the HTTP API server
pub async fn run_server(config: Config, store: Arc<dyn UserStore>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, AppState::new(config.auth, store)).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
