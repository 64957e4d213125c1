//! Book review service

use std::sync::Arc;

use chrono::Utc;

use crate::{
    context::RequestContext,
    error::{AppError, AppResult},
    models::{NewReview, Review, ReviewUpdate},
    repository::DataStore,
};

use super::require_id;

#[derive(Clone)]
pub struct ReviewsService {
    store: Arc<dyn DataStore>,
}

impl ReviewsService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Add a review to an existing book
    pub async fn add_review(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        new_review: NewReview,
    ) -> AppResult<Review> {
        require_id(book_id, AppError::EmptyBookId)?;
        self.store.get_book(ctx, book_id).await?;

        let review = Review::new(book_id, new_review);
        review.validate()?;

        self.store.add_review(ctx, &review).await?;
        tracing::info!(request_id = %ctx.request_id, book_id = %book_id, review_id = %review.id, "review created");

        Ok(review)
    }

    /// Page of a book's reviews and the book's total review count
    pub async fn list_reviews(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Review>, usize)> {
        require_id(book_id, AppError::EmptyBookId)?;
        self.store.get_book(ctx, book_id).await?;
        self.store.get_reviews(ctx, book_id, offset, limit).await
    }

    /// Get one review of a book
    pub async fn get_review(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        review_id: &str,
    ) -> AppResult<Review> {
        require_id(book_id, AppError::EmptyBookId)?;
        require_id(review_id, AppError::EmptyReviewId)?;

        self.store.get_book(ctx, book_id).await?;
        self.find_review_of_book(ctx, book_id, review_id).await
    }

    /// Update message and/or user of a review.
    ///
    /// Empty fields in `update` leave the stored value unchanged, so a field
    /// cannot be cleared through this operation.
    pub async fn update_review(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        review_id: &str,
        update: ReviewUpdate,
    ) -> AppResult<Review> {
        require_id(book_id, AppError::EmptyBookId)?;
        require_id(review_id, AppError::EmptyReviewId)?;

        self.store.get_book(ctx, book_id).await?;
        let mut merged = self.find_review_of_book(ctx, book_id, review_id).await?;

        merged.apply(&update, Utc::now());
        merged.validate()?;

        let updated = self.store.update_review(ctx, review_id, &update).await?;
        tracing::info!(request_id = %ctx.request_id, book_id = %book_id, review_id = %review_id, "review updated");

        Ok(updated)
    }

    async fn find_review_of_book(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        review_id: &str,
    ) -> AppResult<Review> {
        let review = self.store.get_review(ctx, review_id).await?;
        if review.book_id != book_id {
            tracing::info!(request_id = %ctx.request_id, book_id = %book_id, review_id = %review_id, "review belongs to another book");
            return Err(AppError::ReviewNotFound);
        }
        Ok(review)
    }
}
