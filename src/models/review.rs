//! Review model and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Maximum number of characters in a review message
pub const MAX_REVIEW_MESSAGE_LENGTH: usize = 200;

/// A user-submitted comment on a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub book_id: String,
    #[validate(nested)]
    pub user: ReviewUser,
    #[validate(length(min = 1, max = 200, message = "Message must be 1-200 characters"))]
    pub message: String,
    pub links: ReviewLinks,
    pub last_updated: DateTime<Utc>,
}

/// Author of a review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReviewUser {
    #[serde(default)]
    #[validate(length(min = 1, message = "Forenames are required"))]
    pub forenames: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Surname is required"))]
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewLinks {
    #[serde(rename = "self")]
    pub self_: String,
    pub book: String,
}

/// Create review request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NewReview {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: ReviewUser,
}

/// Partial review update. Empty or absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ReviewUpdate {
    pub message: Option<String>,
    pub user: Option<ReviewUserUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ReviewUserUpdate {
    pub forenames: Option<String>,
    pub surname: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ReviewUpdate {
    pub fn message(&self) -> Option<&str> {
        non_empty(&self.message)
    }

    pub fn forenames(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| non_empty(&u.forenames))
    }

    pub fn surname(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| non_empty(&u.surname))
    }
}

impl Review {
    /// Build a review for `book_id` with a fresh identifier
    pub fn new(book_id: &str, new_review: NewReview) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            links: ReviewLinks {
                self_: format!("/books/{}/reviews/{}", book_id, id),
                book: format!("/books/{}", book_id),
            },
            id,
            book_id: book_id.to_string(),
            user: new_review.user,
            message: new_review.message,
            last_updated: Utc::now(),
        }
    }

    /// Check message and user.
    ///
    /// Checks run in a fixed order (empty message, incomplete user, message
    /// length) and the first failure is returned.
    pub fn validate(&self) -> AppResult<()> {
        match Validate::validate(self) {
            Ok(()) => Ok(()),
            Err(errors) => Err(self.first_failure(&errors)),
        }
    }

    fn first_failure(&self, errors: &ValidationErrors) -> AppError {
        let message_failed = errors.field_errors().contains_key("message");

        if message_failed && self.message.is_empty() {
            AppError::EmptyReviewMessage
        } else if errors.errors().contains_key("user") {
            AppError::EmptyReviewUser
        } else if message_failed {
            AppError::ReviewMessageTooLong {
                max: MAX_REVIEW_MESSAGE_LENGTH,
            }
        } else {
            AppError::InvalidReview
        }
    }

    /// Apply the non-empty fields of `update` and refresh `last_updated`
    pub fn apply(&mut self, update: &ReviewUpdate, now: DateTime<Utc>) {
        if let Some(message) = update.message() {
            self.message = message.to_string();
        }
        if let Some(forenames) = update.forenames() {
            self.user.forenames = forenames.to_string();
        }
        if let Some(surname) = update.surname() {
            self.user.surname = surname.to_string();
        }
        self.last_updated = now;
    }
}
