//! API integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use books_api::{
    api::create_router, config::AppConfig, repository::InMemoryStore, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router backed by a fresh in-memory store
fn app() -> Router {
    let mut config = AppConfig::default();
    config.pagination.default_limit = 20;
    config.pagination.default_maximum_limit = 1000;
    create_router(AppState::new(config, Arc::new(InMemoryStore::new())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };

    (status, value)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    (status, serde_json::from_slice(&bytes).expect("Failed to parse response"))
}

async fn create_kindred(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({"title": "Kindred", "author": "Octavia E. Butler"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("No id in response").to_string()
}

fn valid_review(message: &str) -> Value {
    json!({"message": message, "user": {"forenames": "name", "surname": "surname"}})
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_add_and_fetch_book() {
    let app = app();
    let id = create_kindred(&app).await;
    assert!(!id.is_empty());

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Kindred");
    assert_eq!(body["author"], "Octavia E. Butler");
    assert_eq!(body["links"]["self"], format!("/books/{}", id));
    assert_eq!(body["links"]["reviews"], format!("/books/{}/reviews", id));
}

#[tokio::test]
async fn test_client_cannot_choose_book_id() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"id": "mine", "title": "Kindred", "author": "Octavia E. Butler"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], "mine");
}

#[tokio::test]
async fn test_create_book_validation() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/books", Some(json!({"title": "Kindred"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "RequiredFieldMissing");
    assert!(body["message"].as_str().unwrap().contains("Missing required field"));

    let (status, body) = send(&app, Method::POST, "/books", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "empty request body");

    let (status, body) = send(&app, Method::POST, "/books", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EmptyRequestBody");

    let (status, body) = send_raw(&app, Method::POST, "/books", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidBook");
}

#[tokio::test]
async fn test_get_missing_book() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "book not found");
}

#[tokio::test]
async fn test_blank_book_id() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "empty book ID in request");
}

#[tokio::test]
async fn test_list_books_pagination() {
    let app = app();
    for _ in 0..3 {
        create_kindred(&app).await;
    }

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, "/books?offset=1&limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["offset"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["total_count"], 3);
}

#[tokio::test]
async fn test_list_books_bad_pagination() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/books?offset=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidOffsetParameter");

    let (status, body) = send(&app, Method::GET, "/books?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidLimitParameter");

    let (status, body) = send(&app, Method::GET, "/books?limit=1001", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "LimitExceedsMaximum");
}

#[tokio::test]
async fn test_repeated_pagination_params() {
    let app = app();
    for _ in 0..3 {
        create_kindred(&app).await;
    }

    let (status, body) = send(&app, Method::GET, "/books?offset=1&offset=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offset"], 1);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, Method::GET, "/books?limit=-1&limit=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidLimitParameter");
    assert_eq!(body["message"], "invalid query parameter: limit");
}

#[tokio::test]
async fn test_checkout_and_checkin() {
    let app = app();
    let id = create_kindred(&app).await;
    let checkout = format!("/books/{}/checkout", id);
    let checkin = format!("/books/{}/checkin", id);

    let (status, body) = send(&app, Method::POST, &checkin, Some(json!({"review": 3}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BookNotCheckedOut");

    let (status, body) = send(&app, Method::POST, &checkout, Some(json!({"who": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BorrowerNameMissing");

    let (status, body) = send(&app, Method::POST, &checkout, Some(json!({"who": "alice"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"][0]["who"], "alice");
    assert!(body["history"][0]["in"].is_null());

    let (status, body) = send(&app, Method::POST, &checkout, Some(json!({"who": "bob"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "this book is currently checked out");

    for score in [0, 6] {
        let (status, body) =
            send(&app, Method::POST, &checkin, Some(json!({"review": score}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ReviewScoreRequired");
    }

    let (status, body) = send(&app, Method::POST, &checkin, Some(json!({"review": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["who"], "alice");
    assert_eq!(history[0]["review"], 4);
    assert!(history[0]["in"].is_string());

    let (status, body) = send(&app, Method::POST, &checkin, Some(json!({"review": 4}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BookNotCheckedOut");
}

#[tokio::test]
async fn test_checkout_missing_book() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/books/does-not-exist/checkout",
        Some(json!({"who": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_review_to_missing_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books/does-not-exist/reviews",
        Some(valid_review("my review")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("book not found"));
}

#[tokio::test]
async fn test_review_message_length() {
    let app = app();
    let id = create_kindred(&app).await;
    let uri = format!("/books/{}/reviews", id);

    let (status, body) = send(&app, Method::POST, &uri, Some(valid_review(&"a".repeat(201)))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("too long"));

    let (status, body) = send(&app, Method::POST, &uri, Some(valid_review(&"a".repeat(200)))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bookId"], id.as_str());
}

#[tokio::test]
async fn test_invalid_review_bodies() {
    let app = app();
    let id = create_kindred(&app).await;
    let uri = format!("/books/{}/reviews", id);

    let (status, body) = send_raw(&app, Method::POST, &uri, "invalidReviewText").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid review");

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({"message": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EmptyReviewMessage");

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({"message": "my review"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EmptyReviewUser");
}

#[tokio::test]
async fn test_review_lifecycle() {
    let app = app();
    let id = create_kindred(&app).await;
    let reviews_uri = format!("/books/{}/reviews", id);

    let (status, created) = send(&app, Method::POST, &reviews_uri, Some(valid_review("my review"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = created["id"].as_str().unwrap().to_string();
    let review_uri = format!("{}/{}", reviews_uri, review_id);
    assert_eq!(created["links"]["self"], review_uri);
    assert_eq!(created["links"]["book"], format!("/books/{}", id));

    let (status, fetched) = send(&app, Method::GET, &review_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, page) = send(&app, Method::GET, &reviews_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["items"][0]["id"], review_id.as_str());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &review_uri,
        Some(json!({"message": "", "user": {"forenames": "new name"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "my review");
    assert_eq!(updated["user"]["forenames"], "new name");
    assert_eq!(updated["user"]["surname"], "surname");

    let (status, body) = send_raw(&app, Method::PUT, &review_uri, r#"{"""#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid review");
}

#[tokio::test]
async fn test_missing_reviews() {
    let app = app();
    let id = create_kindred(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}/reviews/123", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "review not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}/reviews/123", id),
        Some(json!({"message": "new"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ReviewNotFound");

    let (status, body) = send(&app, Method::GET, "/books/does-not-exist/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "book not found");
}

#[tokio::test]
async fn test_empty_review_list() {
    let app = app();
    let id = create_kindred(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}/reviews", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["total_count"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}
