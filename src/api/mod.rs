mod admin;
mod error;
mod session;
mod users;
mod warden;

use axum::{Json, Router, routing::get};
use serde_json::json;
use std::sync::Arc;

use crate::auth::CookieConfig;
use crate::db::Database;
use crate::jwt::{JwtConfig, JwtError};

pub use error::{ApiError, ResultExt};

/// Map a token-issuance failure to a 500. Issuance only fails on encoding
/// or clock errors; the cause is logged, not leaked.
fn issue_error(e: &JwtError) -> ApiError {
    tracing::error!(error = %e, "Failed to issue token");
    ApiError::internal("Failed to issue token")
}

/// Create the API router.
pub fn create_api_router(
    db: Database,
    jwt: Arc<JwtConfig>,
    cookies: CookieConfig,
    production: bool,
) -> Router {
    let admin_state = admin::AdminState {
        db: db.clone(),
        jwt: jwt.clone(),
        cookies: cookies.clone(),
    };

    let warden_state = warden::WardenState {
        db: db.clone(),
        jwt: jwt.clone(),
        cookies: cookies.clone(),
    };

    let users_state = users::UsersState { db, jwt, cookies };

    Router::new()
        .route(
            "/health",
            get(move || async move {
                Json(json!({
                    "status": "ok",
                    "environment": if production { "production" } else { "development" },
                }))
            }),
        )
        .nest("/auth/admin", admin::router(admin_state))
        .nest("/auth/warden", warden::router(warden_state))
        .nest("/auth/user", users::router(users_state))
}
