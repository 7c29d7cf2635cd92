//! Application state management
//!
//! The only state shared across requests is the persistence handle, opened
//! once at startup and injected here, plus the page size clamp from config.

use std::sync::Arc;

use crate::config::Config;
use crate::infrastructure::store::DocumentStore;

/// Shared application state
///
/// Cheap to clone; every handler receives its own copy through axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Document store backing every collection
    pub store: Arc<dyn DocumentStore>,

    /// Upper bound applied to the `limit` of paginated listings
    pub max_page_limit: u64,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, max_page_limit: u64) -> Self {
        Self {
            store,
            max_page_limit: max_page_limit.max(1),
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self::new(store, config.max_page_limit)
    }
}
