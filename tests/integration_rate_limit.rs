mod common;

use axum::http::StatusCode;
use campus::router::init_router;
use campus_config::RateLimitConfig;
use common::{ADMIN_USERNAME, from_peer, json_request, lazy_pool, test_state};
use serde_json::json;
use tower::ServiceExt;

fn strict_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        auth_per_second: 1,
        auth_burst_size: 1,
    }
}

/// Rejected by validation, so the handler never hashes anything.
fn bad_login() -> axum::http::Request<axum::body::Body> {
    json_request(
        "POST",
        "/api/auth/login",
        &json!({"username": ADMIN_USERNAME, "password": ""}),
        None,
    )
}

#[tokio::test]
async fn test_login_rate_limit_exceeded() {
    let app = init_router(test_state(lazy_pool(), strict_config()));

    let first = app
        .clone()
        .oneshot(from_peer(bad_login(), "192.168.1.100:40000"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let second = app
        .oneshot(from_peer(bad_login(), "192.168.1.100:40001"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limit_is_per_ip() {
    let app = init_router(test_state(lazy_pool(), strict_config()));

    let first = app
        .clone()
        .oneshot(from_peer(bad_login(), "10.0.0.1:1000"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let other_ip = app
        .oneshot(from_peer(bad_login(), "10.0.0.2:1000"))
        .await
        .unwrap();
    assert_eq!(other_ip.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_rate_limit_disabled() {
    let app = init_router(test_state(lazy_pool(), RateLimitConfig::disabled()));

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(from_peer(bad_login(), "10.0.0.3:1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_rate_limit_only_applies_to_login() {
    let app = init_router(test_state(lazy_pool(), strict_config()));

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(from_peer(common::get("/health", None), "10.0.0.4:1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
