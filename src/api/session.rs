//! Role-parameterized session endpoints shared by all three role gates.
//!
//! - POST `/logout` - Clear the role's cookie pair
//! - POST `/nuclear-logout` - Best-effort sweep of every known cookie
//! - POST `/refresh` - Exchange refresh token for new access token
//!
//! There is exactly one implementation of each, bound to a role via state;
//! the per-role routers only differ in login/profile.

use axum::{
    Json, Router,
    extract::State,
    http::header::{HeaderName, SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::auth::{self, CookieConfig, HasAuthState, RefreshError, Role};
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct SessionState {
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieConfig,
    pub role: Role,
}

impl HasAuthState for SessionState {
    fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    fn cookies(&self) -> &CookieConfig {
        &self.cookies
    }
}

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/logout", post(logout))
        .route("/nuclear-logout", post(nuclear_logout))
        .route("/refresh", post(refresh))
        .with_state(state)
}

/// Normal logout: unbind the caller's own role cookies. The credentials
/// themselves stay valid until natural expiry; only the transport binding
/// is removed.
async fn logout(State(state): State<SessionState>) -> impl IntoResponse {
    let [clear_access, clear_refresh] = state.cookies.unbind(state.role);
    (
        AppendHeaders([(SET_COOKIE, clear_access), (SET_COOKIE, clear_refresh)]),
        Json(json!({ "status": "success", "message": "Logged out successfully" })),
    )
}

/// Operational escape hatch for clients stuck with stale or incompatible
/// cookies: sweep every role, legacy name and domain variant. Not part of
/// the normal logout flow.
async fn nuclear_logout(State(state): State<SessionState>) -> impl IntoResponse {
    let clears: Vec<(HeaderName, String)> = state
        .cookies
        .unbind_all()
        .into_iter()
        .map(|c| (SET_COOKIE, c))
        .collect();

    tracing::info!(role = %state.role, cookies = clears.len(), "Nuclear logout sweep");

    (
        AppendHeaders(clears),
        Json(json!({ "status": "success", "message": "Nuclear logout completed" })),
    )
}

/// Exchange a valid refresh token for a new access token. Claims are
/// re-derived from the refresh token itself; the refresh cookie is not
/// rotated. On rejection the refresh cookie is cleared by [`RefreshError`].
async fn refresh(
    State(state): State<SessionState>,
    request: axum::extract::Request,
) -> Result<impl IntoResponse, RefreshError> {
    let (parts, _body) = request.into_parts();

    let refreshed = auth::refresh(&parts, &state, state.role)?;

    let mut user = refreshed.claims;
    user.insert("role".to_string(), json!(state.role));

    Ok((
        AppendHeaders([(SET_COOKIE, refreshed.set_cookie)]),
        Json(json!({
            "status": "success",
            "message": "Token refreshed",
            "user": Value::Object(user),
            "tokens": {
                "access_token": refreshed.token,
                "expires_in": refreshed.expires_in,
            },
        })),
    ))
}
