//! Review endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    context::RequestContext,
    error::{AppError, AppResult, ErrorResponse},
    models::{NewReview, Review, ReviewUpdate},
    pagination::{Page, PaginationQuery, ReviewPage},
    AppState,
};

use super::read_json_body;

/// Add a review to a book
#[utoipa::path(
    post,
    path = "/books/{id}/reviews",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = NewReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid review", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn add_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(book_id): Path<String>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Review>)> {
    let new_review: NewReview = read_json_body(&body, AppError::InvalidReview)?;
    let created = state
        .services
        .reviews
        .add_review(&ctx, &book_id, new_review)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List reviews of a book with pagination
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Book ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of reviews", body = ReviewPage),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(book_id): Path<String>,
    query: PaginationQuery,
) -> AppResult<Json<Page<Review>>> {
    let (offset, limit) = state.paginator.get_pagination_values(&query)?;
    let (reviews, total_count) = state
        .services
        .reviews
        .list_reviews(&ctx, &book_id, offset, limit)
        .await?;
    Ok(Json(Page::new(reviews, offset, limit, total_count)))
}

/// Get one review of a book
#[utoipa::path(
    get,
    path = "/books/{id}/reviews/{review_id}",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Book ID"),
        ("review_id" = String, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review details", body = Review),
        (status = 400, description = "Empty book or review ID", body = ErrorResponse),
        (status = 404, description = "Book or review not found", body = ErrorResponse)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((book_id, review_id)): Path<(String, String)>,
) -> AppResult<Json<Review>> {
    let review = state
        .services
        .reviews
        .get_review(&ctx, &book_id, &review_id)
        .await?;
    Ok(Json(review))
}

/// Update message and/or user of a review
#[utoipa::path(
    put,
    path = "/books/{id}/reviews/{review_id}",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Book ID"),
        ("review_id" = String, Path, description = "Review ID")
    ),
    request_body = ReviewUpdate,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, description = "Invalid review update", body = ErrorResponse),
        (status = 404, description = "Book or review not found", body = ErrorResponse)
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((book_id, review_id)): Path<(String, String)>,
    body: Bytes,
) -> AppResult<Json<Review>> {
    let update: ReviewUpdate = read_json_body(&body, AppError::InvalidReview)?;
    let review = state
        .services
        .reviews
        .update_review(&ctx, &book_id, &review_id, update)
        .await?;
    Ok(Json(review))
}
