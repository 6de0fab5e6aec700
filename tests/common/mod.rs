#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use hostelcare::{ServerConfig, create_app, db::Database, jwt::JwtConfig};
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-at-least-32-bytes!!";

/// Low bcrypt cost to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Create a test app backed by an in-memory database.
/// Returns (app, db, jwt) so tests can seed data and mint tokens directly.
pub async fn test_app() -> (axum::Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let jwt = JwtConfig::with_default_ttls(TEST_SECRET);
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        access_ttl_secs: 900,
        refresh_ttl_secs: 86400,
        production: false,
        cookie_domain: None,
    };
    (create_app(&config), db, jwt)
}

pub async fn seed_admin(db: &Database, email: &str, name: &str, password: &str) {
    let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
    db.admins().create(email, name, &hash).await.unwrap();
}

/// Seed a warden. Returns the warden ID.
pub async fn seed_warden(db: &Database, name: &str, mail: &str, password: &str, hid: i64) -> i64 {
    let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
    db.wardens()
        .create(name, mail, Some("555-0100"), &hash, Some(hid))
        .await
        .unwrap()
}

/// Seed a student with a login record. Returns the student ID.
pub async fn seed_student(db: &Database, shid: &str, name: &str, password: &str) -> i64 {
    let sid = db
        .students()
        .create(
            shid,
            name,
            Some(&format!("{}@example.com", shid)),
            Some("555-0101"),
            Some(1),
        )
        .await
        .unwrap();
    let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
    db.students().create_auth(shid, &hash).await.unwrap();
    sid
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn post_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Read the response body as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract Set-Cookie headers from a response.
pub fn extract_set_cookies(response: &axum::http::Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Check if the cookies contain a deletion (Max-Age=0) for the given name.
pub fn has_cleared_cookie(cookies: &[String], cookie_name: &str) -> bool {
    cookies
        .iter()
        .any(|c| c.starts_with(&format!("{}=;", cookie_name)) && c.contains("Max-Age=0"))
}

/// Find the Set-Cookie value for the given name, excluding deletions.
pub fn find_set_cookie<'a>(cookies: &'a [String], cookie_name: &str) -> Option<&'a String> {
    cookies
        .iter()
        .find(|c| c.starts_with(&format!("{}=", cookie_name)) && !c.contains("Max-Age=0"))
}

/// Extract the raw token value from a Set-Cookie string.
pub fn cookie_value(set_cookie: &str) -> &str {
    set_cookie
        .split_once('=')
        .map(|(_, rest)| rest.split(';').next().unwrap_or(""))
        .unwrap_or("")
}
