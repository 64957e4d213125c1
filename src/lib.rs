//! Books API
//!
//! Lending-library record service: books, their checkout/check-in history
//! and per-book reviews, exposed as a REST JSON API over a document store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use context::RequestContext;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub paginator: pagination::Paginator,
}

impl AppState {
    /// Wire services and paginator on top of a data store
    pub fn new(config: AppConfig, store: Arc<dyn repository::DataStore>) -> Self {
        Self {
            paginator: pagination::Paginator::from(&config.pagination),
            services: Arc::new(services::Services::new(store)),
            config: Arc::new(config),
        }
    }
}
