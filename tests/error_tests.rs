// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use darija_translate::error::{
    ApiError, AuthFailure, TranslateError, AUTH_REALM, TEXT_UPSTREAM_MESSAGE,
};
use http_body_util::BodyExt;
use serde_json::Value;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_error_display_messages() {
    let errors = vec![
        TranslateError::InvalidInput("Bad request".to_string()),
        TranslateError::upstream(TEXT_UPSTREAM_MESSAGE, "HTTP 500: boom"),
        TranslateError::Unauthorized(AuthFailure::MissingHeader),
        TranslateError::Config("Bad port".to_string()),
        TranslateError::Internal("Oops".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_status_codes() {
    assert_eq!(
        TranslateError::InvalidInput("x".to_string()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        TranslateError::Unauthorized(AuthFailure::InvalidCredentials).status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        TranslateError::upstream(TEXT_UPSTREAM_MESSAGE, "x").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_upstream_display_hides_detail() {
    let error = TranslateError::upstream(TEXT_UPSTREAM_MESSAGE, "HTTP 403: API key leaked");
    assert_eq!(format!("{}", error), TEXT_UPSTREAM_MESSAGE);
    assert_eq!(error.public_message(), TEXT_UPSTREAM_MESSAGE);
    assert_eq!(error.detail().as_deref(), Some("HTTP 403: API key leaked"));
}

#[tokio::test]
async fn test_production_response_has_no_details() {
    let response =
        TranslateError::upstream(TEXT_UPSTREAM_MESSAGE, "raw upstream text").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], TEXT_UPSTREAM_MESSAGE);
    assert!(body.get("details").is_none());
    assert!(!body.to_string().contains("raw upstream text"));
}

#[tokio::test]
async fn test_development_response_has_details() {
    let error = TranslateError::upstream(TEXT_UPSTREAM_MESSAGE, "raw upstream text");
    let body = body_json(ApiError::new(error, true).into_response()).await;

    assert_eq!(body["message"], TEXT_UPSTREAM_MESSAGE);
    assert_eq!(body["details"], "raw upstream text");
}

#[tokio::test]
async fn test_internal_error_message_is_generic() {
    let body = body_json(TranslateError::Internal("db password wrong".to_string()).into_response()).await;
    assert_eq!(body["message"], "Something went wrong");
    assert!(!body.to_string().contains("db password"));
}

#[tokio::test]
async fn test_unauthorized_response() {
    let response = TranslateError::Unauthorized(AuthFailure::NotConfigured).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        AUTH_REALM
    );

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication not configured on server");
}
