//! Error types for the books API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to clients for every 500-class error
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "internal server error";

/// Main application error type.
///
/// Each user-correctable condition has its own variant so callers can match
/// on the kind rather than on the message text.
#[derive(Error, Debug)]
pub enum AppError {
    // Book content
    #[error("invalid book. Missing required field")]
    RequiredFieldMissing,

    #[error("invalid book")]
    InvalidBook,

    // Request shape
    #[error("empty request body")]
    EmptyRequestBody,

    #[error("empty book ID in request")]
    EmptyBookId,

    #[error("empty review ID in request")]
    EmptyReviewId,

    // Review content
    #[error("invalid review")]
    InvalidReview,

    #[error("empty review message")]
    EmptyReviewMessage,

    #[error("review user must have forenames and surname")]
    EmptyReviewUser,

    #[error("review message is too long (maximum {max} characters)")]
    ReviewMessageTooLong { max: usize },

    // Pagination
    #[error("invalid query parameter: offset")]
    InvalidOffsetParameter,

    #[error("invalid query parameter: limit")]
    InvalidLimitParameter,

    #[error("invalid query parameter: limit exceeds maximum of {max}")]
    LimitExceedsMaximum { max: usize },

    // Checkout state machine
    #[error("invalid checkout request")]
    InvalidCheckout,

    #[error("this book is currently checked out")]
    BookAlreadyCheckedOut,

    #[error("a name must be provided for checkout")]
    BorrowerNameMissing,

    #[error("this book is not currently checked out")]
    BookNotCheckedOut,

    #[error("a review between 1 and 5 must be provided")]
    ReviewScoreRequired,

    // Missing entities
    #[error("book not found")]
    BookNotFound,

    #[error("review not found")]
    ReviewNotFound,

    // Everything below is reported to the client as a generic 500
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error kind
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RequiredFieldMissing
            | AppError::InvalidBook
            | AppError::EmptyRequestBody
            | AppError::EmptyBookId
            | AppError::EmptyReviewId
            | AppError::InvalidReview
            | AppError::EmptyReviewMessage
            | AppError::EmptyReviewUser
            | AppError::ReviewMessageTooLong { .. }
            | AppError::InvalidOffsetParameter
            | AppError::InvalidLimitParameter
            | AppError::LimitExceedsMaximum { .. }
            | AppError::InvalidCheckout
            | AppError::BookAlreadyCheckedOut
            | AppError::BorrowerNameMissing
            | AppError::BookNotCheckedOut
            | AppError::ReviewScoreRequired => StatusCode::BAD_REQUEST,
            AppError::BookNotFound | AppError::ReviewNotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::RequiredFieldMissing => "RequiredFieldMissing",
            AppError::InvalidBook => "InvalidBook",
            AppError::EmptyRequestBody => "EmptyRequestBody",
            AppError::EmptyBookId => "EmptyBookID",
            AppError::EmptyReviewId => "EmptyReviewID",
            AppError::InvalidReview => "InvalidReview",
            AppError::EmptyReviewMessage => "EmptyReviewMessage",
            AppError::EmptyReviewUser => "EmptyReviewUser",
            AppError::ReviewMessageTooLong { .. } => "ReviewMessageTooLong",
            AppError::InvalidOffsetParameter => "InvalidOffsetParameter",
            AppError::InvalidLimitParameter => "InvalidLimitParameter",
            AppError::LimitExceedsMaximum { .. } => "LimitExceedsMaximum",
            AppError::InvalidCheckout => "InvalidCheckout",
            AppError::BookAlreadyCheckedOut => "BookAlreadyCheckedOut",
            AppError::BorrowerNameMissing => "BorrowerNameMissing",
            AppError::BookNotCheckedOut => "BookNotCheckedOut",
            AppError::ReviewScoreRequired => "ReviewScoreRequired",
            AppError::BookNotFound => "BookNotFound",
            AppError::ReviewNotFound => "ReviewNotFound",
            AppError::Database(_) | AppError::Internal(_) => "InternalServerError",
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            INTERNAL_SERVER_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error.cause_chain = ?self, error.message = %self, "request unsuccessful");
        } else {
            tracing::info!(response_status = status.as_u16(), "request unsuccessful: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.public_message(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
