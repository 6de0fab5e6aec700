//! Tests for the role-gated authenticator: cookie and bearer extraction,
//! kind and role enforcement, expiry, and logout.

mod common;

use axum::http::StatusCode;
use common::*;
use hostelcare::auth::Role;
use hostelcare::jwt::{Claims, TokenKind};
use serde_json::{Map, Value, json};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

fn admin_claims() -> Map<String, Value> {
    [
        ("email".to_string(), json!("boss@example.com")),
        ("name".to_string(), json!("Boss")),
    ]
    .into_iter()
    .collect()
}

fn student_claims() -> Map<String, Value> {
    [
        ("sid".to_string(), json!(7)),
        ("shid".to_string(), json!("ABC101")),
        ("name".to_string(), json!("Asha")),
    ]
    .into_iter()
    .collect()
}

/// Hand-craft a token with an exp in the past, signed with the test secret.
fn expired_access_token(role: Role, extra: Map<String, Value>) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        role,
        kind: TokenKind::Access,
        iat: now - 1000,
        exp: now - 100,
        extra,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}

// =============================================================================
// Access token acceptance
// =============================================================================

#[tokio::test]
async fn test_valid_access_cookie_authenticates() {
    let (app, _, jwt) = test_app().await;
    let access = jwt.issue_access(Role::Admin, admin_claims()).unwrap();

    let response = app
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            &format!("admin_access_token={}", access.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "boss@example.com");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_bearer_header_fallback_authenticates() {
    let (app, _, jwt) = test_app().await;
    let access = jwt.issue_access(Role::Student, student_claims()).unwrap();

    let response = app
        .oneshot(get_with_bearer("/auth/user/profile", &access.token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["shid"], "ABC101");
}

#[tokio::test]
async fn test_cookie_takes_precedence_over_bearer() {
    let (app, _, jwt) = test_app().await;
    let cookie_token = jwt.issue_access(Role::Admin, admin_claims()).unwrap();
    let header_claims: Map<String, Value> = [
        ("email".to_string(), json!("other@example.com")),
        ("name".to_string(), json!("Other")),
    ]
    .into_iter()
    .collect();
    let header_token = jwt.issue_access(Role::Admin, header_claims).unwrap();

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/auth/admin/profile")
                .header("cookie", format!("admin_access_token={}", cookie_token.token))
                .header("authorization", format!("Bearer {}", header_token.token))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "boss@example.com");
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_missing_credential_is_unauthorized() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(get_with_cookie("/auth/admin/profile", "foo=bar"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Access token missing");
}

#[tokio::test]
async fn test_expired_access_token_is_unauthorized() {
    let (app, _, _) = test_app().await;
    let token = expired_access_token(Role::Admin, admin_claims());

    let response = app
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            &format!("admin_access_token={}", token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Token has expired");
}

#[tokio::test]
async fn test_malformed_token_is_unauthorized() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            "admin_access_token=not-a-jwt",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let (app, _, _) = test_app().await;
    let other = hostelcare::jwt::JwtConfig::with_default_ttls(b"some-other-secret-of-32-bytes!!!");
    let forged = other.issue_access(Role::Admin, admin_claims()).unwrap();

    let response = app
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            &format!("admin_access_token={}", forged.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_where_access_required() {
    let (app, _, jwt) = test_app().await;
    let refresh = jwt.issue_refresh(Role::Admin, admin_claims()).unwrap();

    // Even before expiry, a refresh token must never authorize a request
    let response = app
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            &format!("admin_access_token={}", refresh.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid token type");
}

#[tokio::test]
async fn test_role_mismatch_is_forbidden() {
    let (app, _, jwt) = test_app().await;
    let warden_claims: Map<String, Value> = [
        ("wid".to_string(), json!(1)),
        ("email".to_string(), json!("wanda@example.com")),
        ("name".to_string(), json!("Wanda")),
        ("hid".to_string(), json!(2)),
    ]
    .into_iter()
    .collect();
    let warden_access = jwt.issue_access(Role::Warden, warden_claims).unwrap();

    // A warden token presented at the admin gate, via the role-agnostic
    // bearer fallback
    let response = app
        .oneshot(get_with_bearer("/auth/admin/profile", &warden_access.token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Insufficient permissions");
}

#[tokio::test]
async fn test_role_mismatch_via_misfiled_cookie_is_forbidden() {
    let (app, _, jwt) = test_app().await;
    let student_access = jwt.issue_access(Role::Student, student_claims()).unwrap();

    // Student token stuffed into the admin cookie slot
    let response = app
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            &format!("admin_access_token={}", student_access.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_clears_own_role_pair() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(post_with_cookie("/auth/warden/logout", "foo=bar"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = extract_set_cookies(&response);
    assert!(has_cleared_cookie(&cookies, "warden_access_token"));
    assert!(has_cleared_cookie(&cookies, "warden_refresh_token"));
    // Normal logout only touches the caller's own role
    assert!(!has_cleared_cookie(&cookies, "admin_access_token"));
    assert!(!has_cleared_cookie(&cookies, "user_access_token"));
}

#[tokio::test]
async fn test_nuclear_logout_sweeps_everything() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(post_with_cookie("/auth/user/nuclear-logout", "foo=bar"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = extract_set_cookies(&response);
    for name in [
        "admin_access_token",
        "admin_refresh_token",
        "warden_access_token",
        "warden_refresh_token",
        "user_access_token",
        "user_refresh_token",
        // Legacy names from historical deployments
        "access_token",
        "refresh_token",
        "sessionid",
        "csrftoken",
        "auth_token",
    ] {
        assert!(
            has_cleared_cookie(&cookies, name),
            "nuclear logout should clear {}",
            name
        );
    }
}

#[tokio::test]
async fn test_cleared_transport_no_longer_authenticates() {
    let (app, _, jwt) = test_app().await;
    let access = jwt.issue_access(Role::Admin, admin_claims()).unwrap();

    // Sanity: the token authenticates before logout
    let response = app
        .clone()
        .oneshot(get_with_cookie(
            "/auth/admin/profile",
            &format!("admin_access_token={}", access.token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A client that honored the logout deletions presents no cookies
    let response = app
        .oneshot(get_with_cookie("/auth/admin/profile", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
