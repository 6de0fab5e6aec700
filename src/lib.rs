pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;

use api::create_api_router;
use auth::CookieConfig;
use axum::Router;
use db::Database;
use jwt::JwtConfig;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Access token TTL in seconds
    pub access_ttl_secs: u64,
    /// Refresh token TTL in seconds
    pub refresh_ttl_secs: u64,
    /// Production deployment: sets Secure cookies and the cookie domain
    pub production: bool,
    /// Cookie domain, applied in production only
    pub cookie_domain: Option<String>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(
        &config.jwt_secret,
        config.access_ttl_secs,
        config.refresh_ttl_secs,
    ));

    // Cookie attributes are fixed per process; the domain only applies to
    // production deployments, localhost cookies are host-only. Max-Age
    // always tracks the codec's TTLs.
    let cookies = CookieConfig {
        secure: config.production,
        domain: if config.production {
            config.cookie_domain.clone()
        } else {
            None
        },
        access_max_age: jwt.access_ttl_secs(),
        refresh_max_age: jwt.refresh_ttl_secs(),
    };

    create_api_router(config.db.clone(), jwt, cookies, config.production)
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
