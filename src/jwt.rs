//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::Role;

/// Token kind for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived access token, authorizes API calls
    Access,
    /// Long-lived refresh token, only exchangeable for a new access token
    Refresh,
}

/// JWT claims shared by both token kinds.
///
/// The claim schema is role-dependent: beyond `role`, `type`, `iat` and
/// `exp`, each role carries its own fields (admin: email/name, warden:
/// wid/email/name/hid, student: shid/sid/name). Those land in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Role the token was issued for, immutable after issuance
    pub role: Role,
    /// Token kind, immutable after issuance
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Role-specific claim fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Default access token duration: 15 minutes
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 15 * 60;

/// Default refresh token duration: 24 hours
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 24 * 60 * 60;

/// Result of issuing a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// Token duration in seconds
    pub expires_in: u64,
}

/// Configuration for JWT operations. Built once at startup from the signing
/// secret and the configured TTLs; read-only afterwards.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and TTLs.
    pub fn new(secret: &[u8], access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Create a configuration with the default 15 min / 24 h TTLs.
    pub fn with_default_ttls(secret: &[u8]) -> Self {
        Self::new(secret, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS)
    }

    /// Access token TTL in seconds.
    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    /// Refresh token TTL in seconds.
    pub fn refresh_ttl_secs(&self) -> u64 {
        self.refresh_ttl_secs
    }

    /// Issue a signed token of the given kind carrying the role-specific
    /// claim fields.
    pub fn issue(
        &self,
        role: Role,
        kind: TokenKind,
        extra: Map<String, Value>,
    ) -> Result<IssuedToken, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::TimeError)?
            .as_secs();

        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };

        let claims = Claims {
            role,
            kind,
            iat: now,
            exp: now + ttl,
            extra,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            expires_in: ttl,
        })
    }

    /// Issue an access token.
    pub fn issue_access(
        &self,
        role: Role,
        extra: Map<String, Value>,
    ) -> Result<IssuedToken, JwtError> {
        self.issue(role, TokenKind::Access, extra)
    }

    /// Issue a refresh token.
    pub fn issue_refresh(
        &self,
        role: Role,
        extra: Map<String, Value>,
    ) -> Result<IssuedToken, JwtError> {
        self.issue(role, TokenKind::Refresh, extra)
    }

    /// Verify the signature and expiry of a token and decode its claims.
    ///
    /// Kind and role checks belong to the callers: this is purely a function
    /// of the token's own bytes plus current time.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed,
            })?;

        Ok(token_data.claims)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Well-formed token past its expiry
    Expired,
    /// Bad signature or structure
    Malformed,
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::Malformed => write!(f, "Invalid token"),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}
