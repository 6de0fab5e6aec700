//! Authentication error types.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Why a credential was rejected.
///
/// The first three are "unauthenticated" (401): the client should log in
/// again. The last two are "forbidden" (403): a valid credential was
/// presented for the wrong purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingCredential,
    Expired,
    InvalidToken,
    WrongTokenKind,
    InsufficientRole,
}

impl AuthErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthErrorKind::MissingCredential
            | AuthErrorKind::Expired
            | AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthErrorKind::WrongTokenKind | AuthErrorKind::InsufficientRole => {
                StatusCode::FORBIDDEN
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::MissingCredential => "Access token missing",
            AuthErrorKind::Expired => "Token has expired",
            AuthErrorKind::InvalidToken => "Invalid token",
            AuthErrorKind::WrongTokenKind => "Invalid token type",
            AuthErrorKind::InsufficientRole => "Insufficient permissions",
        }
    }
}

/// Rejection returned by the auth extractors. Converts to a JSON error
/// response with the matching status code.
#[derive(Debug)]
pub struct AuthError(pub AuthErrorKind);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use axum::Json;

        #[derive(serde::Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.0.status_code(),
            Json(ErrorResponse {
                error: self.0.message(),
            }),
        )
            .into_response()
    }
}

/// Rejection returned by the refresh coordinator. A rejected refresh
/// credential is treated as burned: the error response also clears the
/// role's refresh cookie.
#[derive(Debug)]
pub struct RefreshError {
    pub kind: AuthErrorKind,
    /// Set-Cookie deletions to attach to the error response
    pub clear_cookies: Vec<String>,
}

impl RefreshError {
    pub fn bare(kind: AuthErrorKind) -> Self {
        Self {
            kind,
            clear_cookies: Vec::new(),
        }
    }
}

impl IntoResponse for RefreshError {
    fn into_response(self) -> Response {
        use axum::http::HeaderValue;

        let mut response = AuthError(self.kind).into_response();
        let headers = response.headers_mut();
        for cookie in &self.clear_cookies {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.append(header::SET_COOKIE, value);
            }
        }
        response
    }
}
