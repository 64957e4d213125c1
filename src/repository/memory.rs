//! In-memory data store.
//!
//! All state sits behind one async read-write lock, so a conditional
//! history replacement is checked and applied atomically.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::{
    context::RequestContext,
    error::{AppError, AppResult},
    models::{Book, Checkout, HistoryVersion, Review, ReviewUpdate},
    pagination::slice_window,
};

use super::DataStore;

#[derive(Debug, Default)]
struct Collections {
    books: IndexMap<String, Book>,
    reviews: IndexMap<String, Review>,
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn ping(&self, _ctx: &RequestContext) -> AppResult<()> {
        Ok(())
    }

    async fn add_book(&self, ctx: &RequestContext, book: &Book) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.books.contains_key(&book.id) {
            return Err(AppError::Internal(format!("duplicate book id {}", book.id)));
        }
        inner.books.insert(book.id.clone(), book.clone());
        tracing::debug!(request_id = %ctx.request_id, book_id = %book.id, "book stored in memory");
        Ok(())
    }

    async fn get_book(&self, _ctx: &RequestContext, id: &str) -> AppResult<Book> {
        self.inner
            .read()
            .await
            .books
            .get(id)
            .cloned()
            .ok_or(AppError::BookNotFound)
    }

    async fn get_books(
        &self,
        _ctx: &RequestContext,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Book>, usize)> {
        let inner = self.inner.read().await;
        let books: Vec<Book> = inner
            .books
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((books, inner.books.len()))
    }

    async fn replace_history(
        &self,
        ctx: &RequestContext,
        id: &str,
        expected: HistoryVersion,
        history: &[Checkout],
    ) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(book) = inner.books.get_mut(id) else {
            return Ok(false);
        };

        if book.history_version() != expected {
            tracing::debug!(request_id = %ctx.request_id, book_id = %id, "history changed concurrently");
            return Ok(false);
        }

        book.history = history.to_vec();
        Ok(true)
    }

    async fn add_review(&self, ctx: &RequestContext, review: &Review) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.reviews.contains_key(&review.id) {
            return Err(AppError::Internal(format!("duplicate review id {}", review.id)));
        }
        inner.reviews.insert(review.id.clone(), review.clone());
        tracing::debug!(request_id = %ctx.request_id, review_id = %review.id, "review stored in memory");
        Ok(())
    }

    async fn get_review(&self, _ctx: &RequestContext, id: &str) -> AppResult<Review> {
        self.inner
            .read()
            .await
            .reviews
            .get(id)
            .cloned()
            .ok_or(AppError::ReviewNotFound)
    }

    async fn get_reviews(
        &self,
        _ctx: &RequestContext,
        book_id: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Review>, usize)> {
        let inner = self.inner.read().await;
        let matching: Vec<Review> = inner
            .reviews
            .values()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect();
        Ok((slice_window(&matching, offset, limit), matching.len()))
    }

    async fn update_review(
        &self,
        _ctx: &RequestContext,
        id: &str,
        update: &ReviewUpdate,
    ) -> AppResult<Review> {
        let mut inner = self.inner.write().await;
        let review = inner.reviews.get_mut(id).ok_or(AppError::ReviewNotFound)?;
        review.apply(update, Utc::now());
        Ok(review.clone())
    }

    async fn close(&self) -> AppResult<()> {
        Ok(())
    }
}
