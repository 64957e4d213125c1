//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{books, health, reviews},
    error::ErrorResponse,
    models::{
        book::{CheckInRequest, CheckoutRequest},
        review::ReviewUserUpdate,
        Book, BookLinks, Checkout, NewBook, NewReview, Review, ReviewLinks, ReviewUpdate,
        ReviewUser,
    },
    pagination::{BookPage, ReviewPage},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Books API",
        version = "0.1.0",
        description = "Lending library records: books, checkouts and reviews"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::checkout_book,
        books::checkin_book,
        // Reviews
        reviews::add_review,
        reviews::list_reviews,
        reviews::get_review,
        reviews::update_review,
    ),
    components(
        schemas(
            health::HealthResponse,
            ErrorResponse,
            Book,
            BookLinks,
            Checkout,
            NewBook,
            CheckoutRequest,
            CheckInRequest,
            Review,
            ReviewUser,
            ReviewLinks,
            NewReview,
            ReviewUpdate,
            ReviewUserUpdate,
            BookPage,
            ReviewPage,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "books", description = "Book catalog and lending"),
        (name = "reviews", description = "Book reviews")
    )
)]
pub struct ApiDoc;

/// Swagger UI plus the raw OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
