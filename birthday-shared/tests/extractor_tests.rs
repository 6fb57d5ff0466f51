/// HTTP-level tests for the validated JSON extractor and error responses
///
/// No database required.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use birthday_shared::error::{ApiError, ApiResult};
use birthday_shared::models::item::ItemCreate;
use birthday_shared::models::user::UserRegister;
use birthday_shared::validation::ValidatedJson;
use serde_json::Value;
use tower::ServiceExt;

async fn echo_item(ValidatedJson(item): ValidatedJson<ItemCreate>) -> ApiResult<Json<ItemCreate>> {
    Ok(Json(item))
}

async fn register(ValidatedJson(user): ValidatedJson<UserRegister>) -> ApiResult<Json<Value>> {
    Ok(Json(serde_json::json!({ "email": user.email })))
}

async fn missing() -> ApiResult<Json<Value>> {
    Err(ApiError::from(sqlx::Error::RowNotFound))
}

fn app() -> Router {
    Router::new()
        .route("/items", post(echo_item))
        .route("/signup", post(register))
        .route("/missing", post(missing))
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_valid_body_reaches_handler() {
    let (status, body) = send(json_request("/items", r#"{"title": "Cake"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Cake");
    assert_eq!(body["description"], Value::Null);
}

#[tokio::test]
async fn test_empty_title_is_unprocessable() {
    let (status, body) = send(json_request("/items", r#"{"title": ""}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "title");
    assert_eq!(body["details"][0]["message"], "Title must be 1 to 255 characters");
}

#[tokio::test]
async fn test_every_failed_field_is_reported() {
    let (status, body) = send(json_request(
        "/signup",
        r#"{"email": "not-an-email", "password": "short"}"#,
    ))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_wrong_shape_is_unprocessable() {
    let (status, body) = send(json_request("/items", r#"{"description": "no title"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (status, body) = send(json_request("/items", r#"{"title": "Cake""#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .body(Body::from(r#"{"title": "Cake"}"#))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_row_not_found_renders_404() {
    let (status, body) = send(json_request("/missing", "{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Resource not found");
}
