//! API handlers for the books REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod reviews;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    context::{RequestContext, REQUEST_ID_HEADER},
    error::{AppError, AppResult},
    pagination::PaginationQuery,
    AppState,
};

/// Builds the request context from the `x-request-id` header, or generates one
#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .map(RequestContext::new)
            .unwrap_or_else(RequestContext::generate);

        Ok(ctx)
    }
}

/// Reads `offset` and `limit` from the query string so malformed input
/// surfaces as a pagination error instead of a bare query rejection
#[async_trait]
impl<S> FromRequestParts<S> for PaginationQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri).map_err(|e| {
            tracing::info!("cannot parse query string: {}", e);
            AppError::InvalidOffsetParameter
        })?;

        Ok(PaginationQuery::from_pairs(pairs))
    }
}

/// Parse a JSON request body.
///
/// A missing body, or one that is just `{}`, is an [`AppError::EmptyRequestBody`];
/// anything that does not parse into `T` becomes `invalid`.
pub fn read_json_body<T: DeserializeOwned>(body: &Bytes, invalid: AppError) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::EmptyRequestBody);
    }

    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::info!("cannot parse request body: {}", e);
            return Err(invalid);
        }
    };

    if value.as_object().is_some_and(|object| object.is_empty()) {
        return Err(AppError::EmptyRequestBody);
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::info!("request body has unexpected shape: {}", e);
        invalid
    })
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/checkout", post(books::checkout_book))
        .route("/books/:id/checkin", post(books::checkin_book))
        // Reviews
        .route(
            "/books/:id/reviews",
            get(reviews::list_reviews).post(reviews::add_review),
        )
        .route(
            "/books/:id/reviews/:review_id",
            get(reviews::get_review).put(reviews::update_review),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
