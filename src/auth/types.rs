//! Roles and the authenticated principal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::jwt::Claims;

/// User role for authorization.
///
/// The student role is spelled `user` on the wire: in the `role` claim and
/// in the `user_access_token` / `user_refresh_token` cookie names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "warden")]
    Warden,
    #[serde(rename = "user")]
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Warden, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Warden => "warden",
            Role::Student => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity for a request.
///
/// Reconstructed from the access token's claims on every request; no
/// server-side session record exists. The principal is whatever the
/// credential asserts, trusting the signature alone.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub role: Role,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl Principal {
    /// Get a string claim by name.
    pub fn str_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// Get an integer claim by name.
    pub fn int_claim(&self, name: &str) -> Option<i64> {
        self.claims.get(name).and_then(Value::as_i64)
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            role: claims.role,
            claims: claims.extra,
        }
    }
}
