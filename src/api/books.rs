//! Book catalog and lending endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    context::RequestContext,
    error::{AppError, AppResult, ErrorResponse},
    models::{
        book::{CheckInRequest, CheckoutRequest},
        Book, NewBook,
    },
    pagination::{BookPage, Page, PaginationQuery},
    AppState,
};

use super::read_json_body;

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing body or required field", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Book>)> {
    let new_book: NewBook = read_json_body(&body, AppError::InvalidBook)?;
    let created = state.services.books.create_book(&ctx, new_book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List books with pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    ctx: RequestContext,
    query: PaginationQuery,
) -> AppResult<Json<Page<Book>>> {
    let (offset, limit) = state.paginator.get_pagination_values(&query)?;
    let (books, total_count) = state.services.books.list_books(&ctx, offset, limit).await?;
    Ok(Json(Page::new(books, offset, limit, total_count)))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Empty book ID", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(&ctx, &id).await?;
    Ok(Json(book))
}

/// Check a book out to a borrower
#[utoipa::path(
    post,
    path = "/books/{id}/checkout",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Book checked out", body = Book),
        (status = 400, description = "Already checked out or borrower missing", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn checkout_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Book>> {
    let request: CheckoutRequest = read_json_body(&body, AppError::InvalidCheckout)?;
    let book = state
        .services
        .books
        .checkout_book(&ctx, &id, &request.who)
        .await?;
    Ok(Json(book))
}

/// Check a book back in with a review score
#[utoipa::path(
    post,
    path = "/books/{id}/checkin",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Book checked in", body = Book),
        (status = 400, description = "Not checked out or review score out of range", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn checkin_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Book>> {
    let request: CheckInRequest = read_json_body(&body, AppError::InvalidCheckout)?;
    let book = state
        .services
        .books
        .checkin_book(&ctx, &id, request.review.unwrap_or(0))
        .await?;
    Ok(Json(book))
}
