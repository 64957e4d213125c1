//! MongoDB data store.
//!
//! Books and reviews live in two collections and are looked up by their
//! `id` field. Conditional history writes are a single `update_one` whose
//! filter pins the history length and the state of its last entry.

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};

use crate::{
    config::MongoConfig,
    context::RequestContext,
    error::{AppError, AppResult},
    models::{Book, Checkout, HistoryVersion, Review, ReviewUpdate},
};

use super::DataStore;

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
    books: Collection<Book>,
    reviews: Collection<Review>,
}

impl MongoStore {
    /// Connect and make sure the lookup indexes exist
    pub async fn connect(config: &MongoConfig) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);

        let store = Self {
            books: db.collection(&config.books_collection),
            reviews: db.collection(&config.reviews_collection),
            database: config.database.clone(),
            client,
        };
        store.ensure_indexes().await?;

        tracing::info!(
            "Connected to MongoDB database {} (collections: {}, {})",
            config.database,
            config.books_collection,
            config.reviews_collection
        );

        Ok(store)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let unique_id = || {
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };

        self.books.create_index(unique_id()).await?;
        self.reviews.create_index(unique_id()).await?;
        self.reviews
            .create_index(IndexModel::builder().keys(doc! { "bookId": 1 }).build())
            .await?;

        Ok(())
    }
}

/// Filter matching a book whose history is still at `expected`
fn history_filter(id: &str, expected: HistoryVersion) -> Document {
    let mut filter = doc! {
        "id": id,
        "history": { "$size": expected.len as i64 },
    };

    if expected.len > 0 {
        let last_in = format!("history.{}.in", expected.len - 1);
        if expected.open {
            // matches both null and missing
            filter.insert(last_in, Bson::Null);
        } else {
            filter.insert(last_in, doc! { "$ne": Bson::Null });
        }
    }

    filter
}

/// `$set` document carrying only the non-empty fields of `update`
fn review_update_document(update: &ReviewUpdate) -> AppResult<Document> {
    let mut set = Document::new();
    if let Some(message) = update.message() {
        set.insert("message", message);
    }
    if let Some(forenames) = update.forenames() {
        set.insert("user.forenames", forenames);
    }
    if let Some(surname) = update.surname() {
        set.insert("user.surname", surname);
    }
    set.insert("lastUpdated", to_bson(&Utc::now())?);

    Ok(doc! { "$set": set })
}

fn to_bson<T: serde::Serialize>(value: &T) -> AppResult<Bson> {
    bson::to_bson(value).map_err(|e| AppError::Internal(format!("bson serialization failed: {}", e)))
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl DataStore for MongoStore {
    async fn ping(&self, ctx: &RequestContext) -> AppResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                tracing::error!(request_id = %ctx.request_id, "MongoDB ping failed: {}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }

    async fn add_book(&self, ctx: &RequestContext, book: &Book) -> AppResult<()> {
        self.books.insert_one(book).await?;
        tracing::debug!(request_id = %ctx.request_id, book_id = %book.id, "book inserted");
        Ok(())
    }

    async fn get_book(&self, _ctx: &RequestContext, id: &str) -> AppResult<Book> {
        self.books
            .find_one(doc! { "id": id })
            .await?
            .ok_or(AppError::BookNotFound)
    }

    async fn get_books(
        &self,
        _ctx: &RequestContext,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Book>, usize)> {
        let total = self.books.count_documents(doc! {}).await?;

        // A zero limit means "no limit" to MongoDB
        let books = if limit == 0 {
            Vec::new()
        } else {
            self.books
                .find(doc! {})
                .sort(doc! { "_id": 1 })
                .skip(to_u64(offset))
                .limit(to_i64(limit))
                .await?
                .try_collect()
                .await?
        };

        Ok((books, total as usize))
    }

    async fn replace_history(
        &self,
        ctx: &RequestContext,
        id: &str,
        expected: HistoryVersion,
        history: &[Checkout],
    ) -> AppResult<bool> {
        let result = self
            .books
            .update_one(
                history_filter(id, expected),
                doc! { "$set": { "history": to_bson(&history)? } },
            )
            .await?;

        if result.matched_count == 0 {
            tracing::debug!(request_id = %ctx.request_id, book_id = %id, "conditional history update matched nothing");
        }

        Ok(result.matched_count == 1)
    }

    async fn add_review(&self, ctx: &RequestContext, review: &Review) -> AppResult<()> {
        self.reviews.insert_one(review).await?;
        tracing::debug!(request_id = %ctx.request_id, review_id = %review.id, "review inserted");
        Ok(())
    }

    async fn get_review(&self, _ctx: &RequestContext, id: &str) -> AppResult<Review> {
        self.reviews
            .find_one(doc! { "id": id })
            .await?
            .ok_or(AppError::ReviewNotFound)
    }

    async fn get_reviews(
        &self,
        _ctx: &RequestContext,
        book_id: &str,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Review>, usize)> {
        let filter = doc! { "bookId": book_id };
        let total = self.reviews.count_documents(filter.clone()).await?;

        let reviews = if limit == 0 {
            Vec::new()
        } else {
            self.reviews
                .find(filter)
                .sort(doc! { "_id": 1 })
                .skip(to_u64(offset))
                .limit(to_i64(limit))
                .await?
                .try_collect()
                .await?
        };

        Ok((reviews, total as usize))
    }

    async fn update_review(
        &self,
        ctx: &RequestContext,
        id: &str,
        update: &ReviewUpdate,
    ) -> AppResult<Review> {
        let updated = self
            .reviews
            .find_one_and_update(doc! { "id": id }, review_update_document(update)?)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(AppError::ReviewNotFound)?;

        tracing::debug!(request_id = %ctx.request_id, review_id = %id, "review updated");
        Ok(updated)
    }

    async fn close(&self) -> AppResult<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
