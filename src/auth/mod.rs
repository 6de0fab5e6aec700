//! Role-scoped JWT authentication.
//!
//! Dual-token system: short-lived access tokens (default 15 min) and
//! long-lived refresh tokens (default 24 h), both stateless and carried in
//! per-role cookies or an Authorization header. One generic verification
//! procedure is bound to each of the three roles.

mod cookie;
mod errors;
mod extractors;
mod refresh;
mod state;
mod types;

pub use cookie::{
    CookieConfig, access_cookie_name, bearer_token, get_cookie, refresh_cookie_name,
};
pub use errors::{AuthError, AuthErrorKind, RefreshError};
pub use extractors::{AdminAuth, StudentAuth, WardenAuth, authenticate};
pub use refresh::{RefreshedAccess, refresh};
pub use state::HasAuthState;
pub use types::{Principal, Role};
