//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`SearchError`], [`StoreError`]) for detailed handling
//! - HTTP handlers map failures to [`ApiError`](crate::server::ApiError) instead
//!
//! # Example
//!
//! ```ignore
//! use tunebridge::error::{Result, ResultExt};
//!
//! fn open_history(path: &Path) -> Result<DownloadHistory> {
//!     let store = JsonFileStore::open(path).with_context("opening store")?;
//!     Ok(DownloadHistory::new(Arc::new(store)))
//! }
//! ```

use crate::config::ConfigError;
use crate::player::PlaybackError;
use crate::recommend::RecommendError;
use crate::search::SearchError;
use crate::store::StoreError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream search error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Sentiment service error
    #[error("Recommendation error: {0}")]
    Recommend(#[from] RecommendError),

    /// Persisted store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Audio playback error
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}
