//! Admin authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use super::session::{self, SessionState};
use crate::auth::{AdminAuth, CookieConfig, Role};
use crate::db::Database;
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieConfig,
}

impl_has_auth_state!(AdminState);

pub fn router(state: AdminState) -> Router {
    let session = session::router(SessionState {
        jwt: state.jwt.clone(),
        cookies: state.cookies.clone(),
        role: Role::Admin,
    });

    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile))
        .with_state(state)
        .merge(session)
}

#[derive(Deserialize)]
struct AdminLogin {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AdminState>,
    Json(credentials): Json<AdminLogin>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state
        .db
        .admins()
        .get_by_email(&credentials.email)
        .await
        .db_err("Failed to look up admin")?
        .ok_or_else(|| ApiError::unauthorized("Invalid admin credentials"))?;

    let password_ok = bcrypt::verify(&credentials.password, &admin.password_hash)
        .map_err(|e| ApiError::db_error("Password verification failed", e))?;
    if !password_ok {
        return Err(ApiError::unauthorized("Invalid admin credentials"));
    }

    let claims: serde_json::Map<String, Value> = [
        ("email".to_string(), json!(admin.email)),
        ("name".to_string(), json!(admin.name)),
    ]
    .into_iter()
    .collect();

    let access = state
        .jwt
        .issue_access(Role::Admin, claims.clone())
        .map_err(|e| super::issue_error(&e))?;
    let refresh = state
        .jwt
        .issue_refresh(Role::Admin, claims)
        .map_err(|e| super::issue_error(&e))?;

    tracing::info!(email = %admin.email, "Admin logged in");

    let [set_access, set_refresh] = state.cookies.bind(Role::Admin, &access.token, &refresh.token);

    Ok((
        AppendHeaders([(SET_COOKIE, set_access), (SET_COOKIE, set_refresh)]),
        Json(json!({
            "status": "success",
            "message": "Admin logged in",
            "admin": {
                "email": admin.email,
                "name": admin.name,
                "role": "admin",
            },
            // Raw tokens included for cross-origin callers that cannot
            // rely on cookies
            "tokens": {
                "access_token": access.token,
                "refresh_token": refresh.token,
                "expires_in": access.expires_in,
            },
        })),
    ))
}

/// The admin's profile, reconstructed from the access token. No DB access.
async fn profile(AdminAuth(principal): AdminAuth) -> Json<Value> {
    tracing::debug!(
        email = principal.str_claim("email").unwrap_or(""),
        "Admin profile read"
    );
    Json(json!({ "status": "success", "user": principal }))
}
