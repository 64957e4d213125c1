//! Persistence layer.
//!
//! Services only see the [`DataStore`] trait. Two implementations are
//! provided: [`memory::InMemoryStore`] for tests and local runs, and
//! [`mongo::MongoStore`] backed by MongoDB.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::{
    context::RequestContext,
    error::AppResult,
    models::{Book, Checkout, HistoryVersion, Review, ReviewUpdate},
};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// Storage capability consumed by the services.
///
/// Missing entities must be reported as `BookNotFound` / `ReviewNotFound`,
/// never as an empty success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self, ctx: &RequestContext) -> AppResult<()>;

    async fn add_book(&self, ctx: &RequestContext, book: &Book) -> AppResult<()>;

    async fn get_book(&self, ctx: &RequestContext, id: &str) -> AppResult<Book>;

    /// Page of books in insertion order, with the total number of books
    async fn get_books(
        &self,
        ctx: &RequestContext,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Book>, usize)>;

    /// Replace a book's history if it still matches `expected`.
    ///
    /// Returns `Ok(false)` when the stored history has moved on (or the book
    /// is gone) so the caller can re-read and retry.
    async fn replace_history(
        &self,
        ctx: &RequestContext,
        id: &str,
        expected: HistoryVersion,
        history: &[Checkout],
    ) -> AppResult<bool>;

    async fn add_review(&self, ctx: &RequestContext, review: &Review) -> AppResult<()>;

    async fn get_review(&self, ctx: &RequestContext, id: &str) -> AppResult<Review>;

    /// Page of a book's reviews in insertion order, with the book's review count
    async fn get_reviews(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Review>, usize)>;

    /// Apply the non-empty fields of `update`, refresh `lastUpdated`, return the result
    async fn update_review(
        &self,
        ctx: &RequestContext,
        id: &str,
        update: &ReviewUpdate,
    ) -> AppResult<Review>;

    /// Release connections
    async fn close(&self) -> AppResult<()>;
}
