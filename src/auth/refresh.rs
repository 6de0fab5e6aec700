//! Refresh coordinator: exchanges a valid refresh token for a new access
//! token and rotates the access cookie.

use axum::http::request::Parts;
use serde_json::{Map, Value};

use super::cookie::{bearer_token, get_cookie, refresh_cookie_name};
use super::errors::{AuthErrorKind, RefreshError};
use super::state::HasAuthState;
use super::types::Role;
use crate::jwt::{Claims, JwtError, TokenKind};

/// Result of a successful refresh.
#[derive(Debug)]
pub struct RefreshedAccess {
    /// The new access token string (returned in the body for cross-origin
    /// callers that cannot rely on cookies)
    pub token: String,
    /// Access token TTL in seconds
    pub expires_in: u64,
    /// Set-Cookie value rotating the access cookie. The refresh cookie is
    /// left untouched.
    pub set_cookie: String,
    /// The claim set embedded in the new access token
    pub claims: Map<String, Value>,
}

/// Claim fields carried over from the refresh token into the new access
/// token, per role. Everything else (exp/iat/type and any stale extras) is
/// dropped.
fn minimal_claim_fields(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &["email", "name"],
        Role::Warden => &["wid", "email", "name", "hid"],
        Role::Student => &["shid", "sid", "name"],
    }
}

/// Re-derive the new access token's claims from the refresh token alone.
///
/// No database round-trip happens here: a change to the underlying user
/// record after refresh-token issuance is not reflected until full re-login.
fn derive_access_claims(role: Role, refresh: &Claims) -> Result<Map<String, Value>, AuthErrorKind> {
    let mut claims = Map::new();
    for field in minimal_claim_fields(role) {
        let value = refresh
            .extra
            .get(*field)
            .ok_or(AuthErrorKind::InvalidToken)?;
        claims.insert(field.to_string(), value.clone());
    }
    Ok(claims)
}

/// Exchange the role's refresh credential for a new access credential.
///
/// On any verification failure the refresh cookie for that role is cleared
/// before the error surfaces: a rejected refresh token is treated as burned
/// rather than left for the client to retry.
pub fn refresh<S>(parts: &Parts, state: &S, role: Role) -> Result<RefreshedAccess, RefreshError>
where
    S: HasAuthState,
{
    let token = get_cookie(&parts.headers, &refresh_cookie_name(role))
        .or_else(|| bearer_token(&parts.headers))
        .ok_or(RefreshError::bare(AuthErrorKind::MissingCredential))?;

    let burn = |kind: AuthErrorKind| RefreshError {
        kind,
        clear_cookies: vec![state.cookies().unbind_refresh(role)],
    };

    let claims = state.jwt().verify(token).map_err(|e| match e {
        JwtError::Expired => burn(AuthErrorKind::Expired),
        _ => burn(AuthErrorKind::InvalidToken),
    })?;

    if claims.kind != TokenKind::Refresh || claims.role != role {
        tracing::debug!(role = %role, "Rejected refresh token (wrong kind or role)");
        return Err(burn(AuthErrorKind::WrongTokenKind));
    }

    let access_claims = derive_access_claims(role, &claims).map_err(burn)?;

    let issued = state
        .jwt()
        .issue_access(role, access_claims.clone())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to issue access token");
            burn(AuthErrorKind::InvalidToken)
        })?;

    let set_cookie = state.cookies().set_access(role, &issued.token);

    Ok(RefreshedAccess {
        token: issued.token,
        expires_in: issued.expires_in,
        set_cookie,
        claims: access_claims,
    })
}
