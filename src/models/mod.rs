//! Data models for the books API

pub mod book;
pub mod review;

// Re-export commonly used types
pub use book::{Book, BookLinks, BookState, Checkout, HistoryVersion, NewBook};
pub use review::{NewReview, Review, ReviewLinks, ReviewUpdate, ReviewUser};
