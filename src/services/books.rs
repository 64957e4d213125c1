//! Book catalog and lending service

use std::sync::Arc;

use crate::{
    context::RequestContext,
    error::{AppError, AppResult},
    models::{Book, NewBook},
    repository::DataStore,
};

use super::require_id;

/// Attempts at a conditional history write before giving up
const MAX_HISTORY_WRITE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn DataStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new book
    pub async fn create_book(&self, ctx: &RequestContext, new_book: NewBook) -> AppResult<Book> {
        let book = Book::new(new_book);
        book.validate()?;

        self.store.add_book(ctx, &book).await?;
        tracing::info!(request_id = %ctx.request_id, book_id = %book.id, "book created");

        Ok(book)
    }

    /// Page of books and total book count
    pub async fn list_books(
        &self,
        ctx: &RequestContext,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Book>, usize)> {
        self.store.get_books(ctx, offset, limit).await
    }

    /// Get book by ID
    pub async fn get_book(&self, ctx: &RequestContext, id: &str) -> AppResult<Book> {
        require_id(id, AppError::EmptyBookId)?;
        self.store.get_book(ctx, id).await
    }

    /// Lend a book to `borrower`
    pub async fn checkout_book(
        &self,
        ctx: &RequestContext,
        id: &str,
        borrower: &str,
    ) -> AppResult<Book> {
        let book = self
            .transition(ctx, id, |book| book.checkout(borrower))
            .await?;
        tracing::info!(request_id = %ctx.request_id, book_id = %id, who = %borrower, "book checked out");
        Ok(book)
    }

    /// Return a book with a review score
    pub async fn checkin_book(&self, ctx: &RequestContext, id: &str, review: i64) -> AppResult<Book> {
        let book = self
            .transition(ctx, id, |book| book.check_in(review))
            .await?;
        tracing::info!(request_id = %ctx.request_id, book_id = %id, review, "book checked in");
        Ok(book)
    }

    /// Read, apply a state-machine transition, and write back conditionally.
    ///
    /// When another request changed the history in between, the book is
    /// re-read so the transition is judged against the latest state.
    async fn transition<F>(&self, ctx: &RequestContext, id: &str, apply: F) -> AppResult<Book>
    where
        F: Fn(&mut Book) -> AppResult<()> + Send + Sync,
    {
        require_id(id, AppError::EmptyBookId)?;

        for attempt in 1..=MAX_HISTORY_WRITE_ATTEMPTS {
            let mut book = self.store.get_book(ctx, id).await?;
            let expected = book.history_version();

            apply(&mut book)?;

            if self
                .store
                .replace_history(ctx, id, expected, &book.history)
                .await?
            {
                return Ok(book);
            }

            tracing::warn!(request_id = %ctx.request_id, book_id = %id, attempt, "book history changed concurrently, retrying");
        }

        Err(AppError::Internal(format!(
            "book {} history kept changing after {} attempts",
            id, MAX_HISTORY_WRITE_ATTEMPTS
        )))
    }
}
