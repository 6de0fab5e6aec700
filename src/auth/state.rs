//! Authentication state trait and macro.

use super::cookie::CookieConfig;
use crate::jwt::JwtConfig;

/// Trait for state types that provide the token codec and cookie
/// configuration for authentication. Both are immutable after startup;
/// authentication never touches the database.
pub trait HasAuthState {
    fn jwt(&self) -> &JwtConfig;
    fn cookies(&self) -> &CookieConfig;
}

/// Implement `HasAuthState` for state structs with the standard fields.
///
/// The struct must have these fields:
/// - `jwt: Arc<JwtConfig>`
/// - `cookies: CookieConfig`
#[macro_export]
macro_rules! impl_has_auth_state {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthState for $state_type {
            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
            fn cookies(&self) -> &$crate::auth::CookieConfig {
                &self.cookies
            }
        }
    };
}
