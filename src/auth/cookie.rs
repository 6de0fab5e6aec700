//! Cookie transport binding for credentials.
//!
//! Credentials travel in a per-role cookie pair (`{role}_access_token` /
//! `{role}_refresh_token`) or an `Authorization: Bearer` header. Cookie
//! attributes are resolved once per process from the deployment environment.

use axum::http::header;

use super::types::Role;

/// Legacy cookie names swept by [`CookieConfig::unbind_all`]. Left behind by
/// historical deployments; clearing them is best-effort, never complete.
const LEGACY_COOKIE_NAMES: [&str; 5] = [
    "access_token",
    "refresh_token",
    "sessionid",
    "csrftoken",
    "auth_token",
];

/// Cookie name for a role's access token.
pub fn access_cookie_name(role: Role) -> String {
    format!("{}_access_token", role.as_str())
}

/// Cookie name for a role's refresh token.
pub fn refresh_cookie_name(role: Role) -> String {
    format!("{}_refresh_token", role.as_str())
}

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Extract a bearer token from the Authorization header.
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Per-environment cookie attributes, resolved once at startup.
///
/// Deletions must be issued with the same domain/path/secure/samesite used
/// when binding, or browsers silently keep the cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Set the Secure flag (production only)
    pub secure: bool,
    /// Cookie domain (production only; None on localhost)
    pub domain: Option<String>,
    /// Max-Age for access token cookies, in seconds
    pub access_max_age: u64,
    /// Max-Age for refresh token cookies, in seconds
    pub refresh_max_age: u64,
}

impl CookieConfig {
    /// The fixed attribute tail shared by every cookie this process sets.
    fn attributes(&self, domain: Option<&str>) -> String {
        let mut attrs = String::from("; HttpOnly; SameSite=Lax; Path=/");
        if let Some(domain) = domain {
            attrs.push_str("; Domain=");
            attrs.push_str(domain);
        }
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    fn set(&self, name: &str, value: &str, max_age: u64) -> String {
        format!(
            "{}={}; Max-Age={}{}",
            name,
            value,
            max_age,
            self.attributes(self.domain.as_deref())
        )
    }

    fn clear(&self, name: &str, domain: Option<&str>) -> String {
        format!("{}=; Max-Age=0{}", name, self.attributes(domain))
    }

    /// Set-Cookie values binding both credentials for a role.
    pub fn bind(&self, role: Role, access_token: &str, refresh_token: &str) -> [String; 2] {
        [
            self.set(&access_cookie_name(role), access_token, self.access_max_age),
            self.set(
                &refresh_cookie_name(role),
                refresh_token,
                self.refresh_max_age,
            ),
        ]
    }

    /// Set-Cookie value rotating only the access credential (used by
    /// refresh; the refresh cookie is left untouched).
    pub fn set_access(&self, role: Role, access_token: &str) -> String {
        self.set(&access_cookie_name(role), access_token, self.access_max_age)
    }

    /// Set-Cookie values removing both credentials for a role, using the
    /// same attribute set that bound them.
    pub fn unbind(&self, role: Role) -> [String; 2] {
        [
            self.clear(&access_cookie_name(role), self.domain.as_deref()),
            self.clear(&refresh_cookie_name(role), self.domain.as_deref()),
        ]
    }

    /// Set-Cookie value removing only the refresh credential for a role.
    /// A rejected refresh token is treated as burned.
    pub fn unbind_refresh(&self, role: Role) -> String {
        self.clear(&refresh_cookie_name(role), self.domain.as_deref())
    }

    /// Best-effort sweep: removal across every role/name combination,
    /// legacy names, and plausible domain variants. An operational escape
    /// hatch for clients stuck with cookies from misconfigured historical
    /// deployments, not part of normal logout.
    pub fn unbind_all(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for role in Role::ALL {
            names.push(access_cookie_name(role));
            names.push(refresh_cookie_name(role));
        }
        names.extend(LEGACY_COOKIE_NAMES.iter().map(|n| n.to_string()));

        let mut domains: Vec<Option<&str>> = vec![None];
        if let Some(domain) = self.domain.as_deref() {
            domains.push(Some(domain));
        }

        let mut cookies = Vec::with_capacity(names.len() * domains.len());
        for name in &names {
            for domain in &domains {
                cookies.push(self.clear(name, *domain));
            }
        }
        cookies
    }
}
