mod common;

use axum::http::StatusCode;
use campus_auth::{Role, create_access_token};
use common::{
    ADMIN_PASSWORD, ADMIN_USERNAME, admin_token, body_json, get, json_request, setup_test_app,
    student_token,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "proxy-42")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "proxy-42");

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();
    let response = app
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/admin/exam-groups/resolve"].is_object());
}

#[tokio::test]
async fn test_student_routes_require_token() {
    let app = setup_test_app();
    let response = app.oneshot(get("/api/student/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Missing authorization header"
    );
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = setup_test_app();
    let request = axum::http::Request::builder()
        .uri("/api/admin/sync-logs")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = setup_test_app();
    let config = campus_config::JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expiry: 3600,
    };
    let token = create_access_token("16004321", Role::Student, "X", &config).unwrap();
    let response = app
        .oneshot(get("/api/student/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_cannot_reach_admin_routes() {
    let app = setup_test_app();
    let token = student_token("16004321");
    let response = app
        .oneshot(get("/api/admin/grouping-rules", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Access denied. Required role: admin"
    );
}

#[tokio::test]
async fn test_admin_cannot_reach_student_routes() {
    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/student/grades", Some(&admin_token())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_login_success() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    let claims =
        campus_auth::verify_token(body["access_token"].as_str().unwrap(), &common::jwt_config())
            .unwrap();
    assert_eq!(claims.sub, ADMIN_USERNAME);
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn test_admin_login_wrong_password() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": ADMIN_USERNAME, "password": "wrong-password"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid username or password"
    );
}

#[tokio::test]
async fn test_login_missing_field_is_bad_request() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": ADMIN_USERNAME}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "password is required");
}

#[tokio::test]
async fn test_login_empty_fields_fail_validation() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "", "password": ""}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"],
        "password is required, username is required"
    );
}

#[tokio::test]
async fn test_verify_garbage_token_is_invalid_not_an_error() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/documents/verify",
            &json!({"token": "not.a.token"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert!(body["claims"].is_null());
}

#[tokio::test]
async fn test_verify_issued_token() {
    use campus_auth::{DocumentIssuer, DocumentKind, DocumentRequest, SignedDocuments};

    let issuer = SignedDocuments::new(&common::document_config());
    let issued = issuer
        .issue(DocumentRequest {
            student_code: "16004321".to_string(),
            kind: DocumentKind::Attestation,
            semester: Some(3),
            academic_year: Some("2024".to_string()),
        })
        .unwrap();

    let app = setup_test_app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/documents/verify",
            &json!({"token": issued.token}),
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["claims"]["sub"], "16004321");
    assert_eq!(body["claims"]["kind"], "attestation");
    assert_eq!(body["claims"]["semester"], 3);

    let mut tampered = issued.token.clone();
    tampered.push('x');
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/documents/verify",
            &json!({"token": tampered}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["valid"], false);
}

#[tokio::test]
async fn test_verify_requires_token() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request("POST", "/api/documents/verify", &json!({"token": ""}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_resolve_requires_module() {
    let app = setup_test_app();
    let response = app
        .oneshot(get(
            "/api/admin/exam-groups/resolve?module=%20",
            Some(&admin_token()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_grouping_rule_validation() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/grouping-rules",
            &json!({"module_pattern": "JMDS1%", "group_name": "", "range_start": "A", "range_end": "K"}),
            Some(&admin_token()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"],
        "group_name must be 1-50 characters"
    );
}

#[tokio::test]
async fn test_reversed_grouping_rule_range() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/grouping-rules",
            &json!({"module_pattern": "JMDS1%", "group_name": "G1", "range_start": "Z", "range_end": "A"}),
            Some(&admin_token()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exam_planning_end_before_start() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/exam-planning",
            &json!({
                "module_pattern": "JMDS1%",
                "cod_anu": "2024",
                "session_kind": "normale",
                "exam_date": "2025-01-15",
                "start_time": "11:00:00",
                "end_time": "09:00:00"
            }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "start_time must be before end_time"
    );
}

#[tokio::test]
async fn test_exam_planning_unknown_session_kind() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/exam-planning",
            &json!({
                "module_pattern": "JMDS1%",
                "cod_anu": "2024",
                "session_kind": "finale",
                "exam_date": "2025-01-15",
                "start_time": "09:00:00",
                "end_time": "11:00:00"
            }),
            Some(&admin_token()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
