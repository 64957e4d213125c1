//! Book model and the checkout/check-in state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Lowest accepted review score at check-in
pub const MIN_REVIEW_SCORE: i64 = 1;
/// Highest accepted review score at check-in
pub const MAX_REVIEW_SCORE: i64 = 5;

/// A catalog entry with its borrowing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Book {
    pub id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    pub links: BookLinks,
    /// Append-only; only the last entry is ever mutated (at check-in)
    #[serde(default)]
    pub history: Vec<Checkout>,
}

/// Derived links for a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookLinks {
    #[serde(rename = "self")]
    pub self_: String,
    pub reviews: String,
}

impl BookLinks {
    pub fn for_book(id: &str) -> Self {
        Self {
            self_: format!("/books/{}", id),
            reviews: format!("/books/{}/reviews", id),
        }
    }
}

/// One borrow/return cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Checkout {
    pub who: String,
    pub out: DateTime<Utc>,
    /// Unset while the book is checked out
    #[serde(rename = "in", default)]
    pub checked_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review: Option<i64>,
}

impl Checkout {
    pub fn is_open(&self) -> bool {
        self.checked_in.is_none()
    }
}

/// Availability derived from the tail of the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Available,
    CheckedOut,
}

/// Snapshot of a history used for conditional writes.
///
/// Two snapshots are equal when the history has the same length and the
/// same open/closed tail, which is all a transition depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryVersion {
    pub len: usize,
    pub open: bool,
}

/// Create book request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub synopsis: Option<String>,
}

/// Checkout request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Borrower name
    #[serde(default)]
    pub who: String,
}

/// Check-in request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// Score between 1 and 5
    pub review: Option<i64>,
}

impl Book {
    /// Build a new book with a fresh identifier and derived links
    pub fn new(new_book: NewBook) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            links: BookLinks::for_book(&id),
            id,
            title: new_book.title,
            author: new_book.author,
            synopsis: new_book.synopsis.filter(|s| !s.is_empty()),
            history: Vec::new(),
        }
    }

    /// Check required fields
    pub fn validate(&self) -> AppResult<()> {
        Validate::validate(self).map_err(|errors| {
            tracing::debug!(book_id = %self.id, "book rejected: {}", errors);
            AppError::RequiredFieldMissing
        })
    }

    /// Current state, read from the last history entry only
    pub fn state(&self) -> BookState {
        match self.history.last() {
            Some(last) if last.is_open() => BookState::CheckedOut,
            _ => BookState::Available,
        }
    }

    pub fn history_version(&self) -> HistoryVersion {
        HistoryVersion {
            len: self.history.len(),
            open: self.state() == BookState::CheckedOut,
        }
    }

    /// Lend the book to `borrower`
    pub fn checkout(&mut self, borrower: &str) -> AppResult<()> {
        self.checkout_at(borrower, Utc::now())
    }

    /// Lend the book to `borrower` at the given instant
    pub fn checkout_at(&mut self, borrower: &str, now: DateTime<Utc>) -> AppResult<()> {
        if self.state() == BookState::CheckedOut {
            return Err(AppError::BookAlreadyCheckedOut);
        }

        if borrower.is_empty() {
            return Err(AppError::BorrowerNameMissing);
        }

        self.history.push(Checkout {
            who: borrower.to_string(),
            out: now,
            checked_in: None,
            review: None,
        });

        Ok(())
    }

    /// Return the book with a review score
    pub fn check_in(&mut self, review: i64) -> AppResult<()> {
        self.check_in_at(review, Utc::now())
    }

    /// Return the book with a review score at the given instant.
    ///
    /// A book that was never borrowed and a book that is already back both
    /// yield [`AppError::BookNotCheckedOut`].
    pub fn check_in_at(&mut self, review: i64, now: DateTime<Utc>) -> AppResult<()> {
        let last = match self.history.last_mut() {
            Some(last) if last.is_open() => last,
            _ => return Err(AppError::BookNotCheckedOut),
        };

        if !(MIN_REVIEW_SCORE..=MAX_REVIEW_SCORE).contains(&review) {
            return Err(AppError::ReviewScoreRequired);
        }

        last.checked_in = Some(now);
        last.review = Some(review);

        Ok(())
    }
}
