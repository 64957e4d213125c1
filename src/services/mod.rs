//! Business logic services

pub mod books;
pub mod reviews;

use std::sync::Arc;

use crate::{
    context::RequestContext,
    error::{AppError, AppResult},
    repository::DataStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub reviews: reviews::ReviewsService,
    store: Arc<dyn DataStore>,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            books: books::BooksService::new(store.clone()),
            reviews: reviews::ReviewsService::new(store.clone()),
            store,
        }
    }

    /// Check that the data store answers
    pub async fn ping(&self, ctx: &RequestContext) -> AppResult<()> {
        self.store.ping(ctx).await
    }

    /// Release the data store
    pub async fn shutdown(&self) -> AppResult<()> {
        self.store.close().await
    }
}

/// Reject blank path identifiers with the given error
pub(crate) fn require_id(id: &str, err: AppError) -> AppResult<()> {
    if id.trim().is_empty() {
        return Err(err);
    }
    Ok(())
}
