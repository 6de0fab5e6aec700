//! Student authentication endpoints.
//!
//! Students log in with the hostel-issued SHID; their role is spelled
//! `user` on the wire, so these routes live under `/auth/user`.

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
use crate::auth::{CookieConfig, Role, StudentAuth};
use crate::db::Database;
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieConfig,
}

impl_has_auth_state!(UsersState);

pub fn router(state: UsersState) -> Router {
    let session = session::router(SessionState {
        jwt: state.jwt.clone(),
        cookies: state.cookies.clone(),
        role: Role::Student,
    });

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .with_state(state)
        .merge(session)
}

#[derive(Deserialize)]
struct UserRegister {
    shid: String,
    pswd: String,
}

#[derive(Deserialize)]
struct UserLogin {
    shid: String,
    pswd: String,
}

/// Register a login for an existing student record.
async fn register(
    State(state): State<UsersState>,
    Json(data): Json<UserRegister>,
) -> Result<impl IntoResponse, ApiError> {
    if data.pswd.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let student = state
        .db
        .students()
        .get_by_shid(&data.shid)
        .await
        .db_err("Failed to look up student")?;
    if student.is_none() {
        return Err(ApiError::not_found("SHID not found"));
    }

    let existing = state
        .db
        .students()
        .get_auth(&data.shid)
        .await
        .db_err("Failed to look up student login")?;
    if existing.is_some() {
        return Err(ApiError::conflict("SHID already registered"));
    }

    let password_hash = bcrypt::hash(&data.pswd, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::db_error("Failed to hash password", e))?;

    state
        .db
        .students()
        .create_auth(&data.shid, &password_hash)
        .await
        .db_err("Failed to register user")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "message": "User registered successfully" })),
    ))
}

async fn login(
    State(state): State<UsersState>,
    Json(credentials): Json<UserLogin>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_record = state
        .db
        .students()
        .get_auth(&credentials.shid)
        .await
        .db_err("Failed to look up student login")?
        .ok_or_else(|| ApiError::unauthorized("SHID not registered"))?;

    let password_ok = bcrypt::verify(&credentials.pswd, &auth_record.password_hash)
        .map_err(|e| ApiError::db_error("Password verification failed", e))?;
    if !password_ok {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    let student = state
        .db
        .students()
        .get_by_shid(&credentials.shid)
        .await
        .db_err("Failed to look up student")?
        .ok_or_else(|| ApiError::unauthorized("Student data not found"))?;

    let claims: serde_json::Map<String, Value> = [
        ("sid".to_string(), json!(student.sid)),
        ("shid".to_string(), json!(student.shid)),
        ("name".to_string(), json!(student.name)),
        ("email".to_string(), json!(student.mail)),
        ("phone".to_string(), json!(student.phone)),
        ("hid".to_string(), json!(student.hid)),
    ]
    .into_iter()
    .collect();

    let access = state
        .jwt
        .issue_access(Role::Student, claims.clone())
        .map_err(|e| super::issue_error(&e))?;
    let refresh = state
        .jwt
        .issue_refresh(Role::Student, claims)
        .map_err(|e| super::issue_error(&e))?;

    tracing::info!(shid = %student.shid, "Student logged in");

    let [set_access, set_refresh] = state
        .cookies
        .bind(Role::Student, &access.token, &refresh.token);

    Ok((
        AppendHeaders([(SET_COOKIE, set_access), (SET_COOKIE, set_refresh)]),
        Json(json!({
            "status": "success",
            "message": "Login successful",
            "user": {
                "shid": student.shid,
                "name": student.name,
                "email": student.mail,
                "role": "user",
            },
            "tokens": {
                "access_token": access.token,
                "refresh_token": refresh.token,
                "expires_in": access.expires_in,
            },
        })),
    ))
}

/// The student's profile, reconstructed from the access token. No DB access.
async fn profile(StudentAuth(principal): StudentAuth) -> Json<Value> {
    tracing::debug!(
        shid = principal.str_claim("shid").unwrap_or(""),
        "Student profile read"
    );
    Json(json!({ "status": "success", "user": principal }))
}
