//! Axum extractors gating endpoints on a role.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::cookie::{access_cookie_name, bearer_token, get_cookie};
use super::errors::{AuthError, AuthErrorKind};
use super::state::HasAuthState;
use super::types::{Principal, Role};
use crate::jwt::{JwtError, TokenKind};

/// Core authentication procedure shared by all three role gates.
///
/// Looks for the role's access cookie, falling back to the Authorization
/// header, then verifies signature, expiry, kind and role. The principal is
/// reconstructed purely from the verified claims; no identity lookup occurs.
pub fn authenticate<S>(parts: &Parts, state: &S, required_role: Role) -> Result<Principal, AuthError>
where
    S: HasAuthState,
{
    let token = get_cookie(&parts.headers, &access_cookie_name(required_role))
        .or_else(|| bearer_token(&parts.headers))
        .ok_or(AuthError(AuthErrorKind::MissingCredential))?;

    let claims = state.jwt().verify(token).map_err(|e| match e {
        JwtError::Expired => AuthError(AuthErrorKind::Expired),
        _ => AuthError(AuthErrorKind::InvalidToken),
    })?;

    if claims.kind != TokenKind::Access {
        tracing::debug!(role = %required_role, "Refresh token presented where access token required");
        return Err(AuthError(AuthErrorKind::WrongTokenKind));
    }

    if claims.role != required_role {
        tracing::debug!(
            expected = %required_role,
            got = %claims.role,
            "Role mismatch on access token"
        );
        return Err(AuthError(AuthErrorKind::InsufficientRole));
    }

    Ok(Principal::from(claims))
}

macro_rules! role_extractor {
    ($(#[$doc:meta])* $name:ident, $role:expr) => {
        $(#[$doc])*
        pub struct $name(pub Principal);

        impl<S> FromRequestParts<S> for $name
        where
            S: HasAuthState + Send + Sync,
        {
            type Rejection = AuthError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                authenticate(parts, state, $role).map($name)
            }
        }
    };
}

role_extractor!(
    /// Extractor for endpoints restricted to admins.
    AdminAuth,
    Role::Admin
);

role_extractor!(
    /// Extractor for endpoints restricted to wardens.
    WardenAuth,
    Role::Warden
);

role_extractor!(
    /// Extractor for endpoints restricted to students.
    StudentAuth,
    Role::Student
);
