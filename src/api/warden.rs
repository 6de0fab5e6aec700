//! Warden authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use super::session::{self, SessionState};
use crate::auth::{CookieConfig, Role, WardenAuth};
use crate::db::Database;
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct WardenState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieConfig,
}

impl_has_auth_state!(WardenState);

pub fn router(state: WardenState) -> Router {
    let session = session::router(SessionState {
        jwt: state.jwt.clone(),
        cookies: state.cookies.clone(),
        role: Role::Warden,
    });

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .with_state(state)
        .merge(session)
}

#[derive(Deserialize)]
struct WardenSignup {
    name: String,
    mail: String,
    phone: Option<String>,
    password: String,
    hid: Option<i64>,
}

#[derive(Deserialize)]
struct WardenLogin {
    mail: String,
    password: String,
}

async fn signup(
    State(state): State<WardenState>,
    Json(details): Json<WardenSignup>,
) -> Result<impl IntoResponse, ApiError> {
    if details.mail.trim().is_empty() || details.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let existing = state
        .db
        .wardens()
        .get_by_mail(&details.mail)
        .await
        .db_err("Failed to look up warden")?;
    if existing.is_some() {
        return Err(ApiError::conflict("Warden with this email already exists"));
    }

    let password_hash = bcrypt::hash(&details.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::db_error("Failed to hash password", e))?;

    state
        .db
        .wardens()
        .create(
            &details.name,
            &details.mail,
            details.phone.as_deref(),
            &password_hash,
            details.hid,
        )
        .await
        .db_err("Failed to create warden")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "message": "Warden registered successfully" })),
    ))
}

async fn login(
    State(state): State<WardenState>,
    Json(credentials): Json<WardenLogin>,
) -> Result<impl IntoResponse, ApiError> {
    let warden = state
        .db
        .wardens()
        .get_by_mail(&credentials.mail)
        .await
        .db_err("Failed to look up warden")?
        .ok_or_else(|| ApiError::unauthorized("Email not registered"))?;

    let password_ok = bcrypt::verify(&credentials.password, &warden.password_hash)
        .map_err(|e| ApiError::db_error("Password verification failed", e))?;
    if !password_ok {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    let claims: serde_json::Map<String, Value> = [
        ("wid".to_string(), json!(warden.wid)),
        ("email".to_string(), json!(warden.mail)),
        ("name".to_string(), json!(warden.name)),
        ("phone".to_string(), json!(warden.phone)),
        ("hid".to_string(), json!(warden.hid)),
    ]
    .into_iter()
    .collect();

    let access = state
        .jwt
        .issue_access(Role::Warden, claims.clone())
        .map_err(|e| super::issue_error(&e))?;
    let refresh = state
        .jwt
        .issue_refresh(Role::Warden, claims)
        .map_err(|e| super::issue_error(&e))?;

    tracing::info!(wid = warden.wid, "Warden logged in");

    let [set_access, set_refresh] = state
        .cookies
        .bind(Role::Warden, &access.token, &refresh.token);

    Ok((
        AppendHeaders([(SET_COOKIE, set_access), (SET_COOKIE, set_refresh)]),
        Json(json!({
            "status": "success",
            "message": "Login successful",
            "warden": {
                "wid": warden.wid,
                "name": warden.name,
                "email": warden.mail,
                "phone": warden.phone,
                "hid": warden.hid,
                "role": "warden",
            },
            "tokens": {
                "access_token": access.token,
                "refresh_token": refresh.token,
                "expires_in": access.expires_in,
            },
        })),
    ))
}

/// The warden's profile, reconstructed from the access token. No DB access.
async fn profile(WardenAuth(principal): WardenAuth) -> Json<Value> {
    tracing::debug!(
        wid = principal.int_claim("wid").unwrap_or(0),
        "Warden profile read"
    );
    Json(json!({ "status": "success", "user": principal }))
}
