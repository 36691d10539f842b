//! Search aggregator - queries the upstream search API and normalizes results.
//!
//! # Architecture
//!
//! - **Client** (`client.rs`) - HTTP access to the three upstream endpoints
//! - **Traits** (`traits.rs`) - `SearchApi` seam for mocking
//! - **Envelope** (`envelope.rs`) - locates the list payload in any response shape
//! - **Aggregator** (this file) - per-kind post-processing via [`crate::normalize`]
//!
//! | Kind | Post-processing |
//! |------|-----------------|
//! | `songs` | full [`Track`] normalization |
//! | `albums` | `imageUrl` and `artist` annotation |
//! | `playlists` | none, array shape only |

pub mod client;
pub mod envelope;
pub mod traits;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::Track;
use crate::normalize::{annotate_album, normalize_tracks};

pub use client::UpstreamSearchClient;
pub use envelope::to_array;
pub use traits::SearchApi;

/// Errors from the search aggregator
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Invalid search type: {0}")]
    InvalidKind(String),

    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// The three upstream search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Songs,
    Playlists,
    Albums,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [Self::Songs, Self::Playlists, Self::Albums];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Playlists => "playlists",
            Self::Albums => "albums",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SearchError::InvalidKind(s.to_string()))
    }
}

/// Results of one search kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchHits {
    /// Normalized songs
    Songs(Vec<Track>),
    /// Playlists or annotated albums, otherwise untouched
    Records(Vec<Value>),
}

impl SearchHits {
    /// Empty result of the right shape for `kind`.
    pub fn empty(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Songs => Self::Songs(Vec::new()),
            SearchKind::Playlists | SearchKind::Albums => Self::Records(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Songs(tracks) => tracks.len(),
            Self::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_records(self) -> Vec<Value> {
        match self {
            Self::Records(records) => records,
            Self::Songs(_) => Vec::new(),
        }
    }

    fn into_tracks(self) -> Vec<Track> {
        match self {
            Self::Songs(tracks) => tracks,
            Self::Records(_) => Vec::new(),
        }
    }
}

/// All three kinds for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOverview {
    pub songs: Vec<Track>,
    pub playlists: Vec<Value>,
    pub albums: Vec<Value>,
}

/// Runs searches against a [`SearchApi`] and post-processes the results.
pub struct SearchAggregator {
    api: Arc<dyn SearchApi>,
}

impl SearchAggregator {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }

    /// Search one kind. A blank query returns an empty result without
    /// calling upstream.
    pub async fn search(&self, kind: SearchKind, query: &str) -> Result<SearchHits, SearchError> {
        if query.trim().is_empty() {
            return Ok(SearchHits::empty(kind));
        }

        let body = self.api.fetch(kind, query).await?;
        let items = to_array(body);
        tracing::debug!("Search {} '{}' -> {} items", kind, query, items.len());

        Ok(match kind {
            SearchKind::Songs => SearchHits::Songs(normalize_tracks(&items)),
            SearchKind::Albums => {
                SearchHits::Records(items.into_iter().map(annotate_album).collect())
            }
            SearchKind::Playlists => SearchHits::Records(items),
        })
    }

    /// Search all kinds concurrently. A failing kind degrades to an empty list.
    pub async fn search_all(&self, query: &str) -> SearchOverview {
        let (songs, playlists, albums) = tokio::join!(
            self.search_or_empty(SearchKind::Songs, query),
            self.search_or_empty(SearchKind::Playlists, query),
            self.search_or_empty(SearchKind::Albums, query),
        );

        SearchOverview {
            songs: songs.into_tracks(),
            playlists: playlists.into_records(),
            albums: albums.into_records(),
        }
    }

    async fn search_or_empty(&self, kind: SearchKind, query: &str) -> SearchHits {
        self.search(kind, query).await.unwrap_or_else(|e| {
            tracing::warn!("Search {} failed, using empty result: {}", kind, e);
            SearchHits::empty(kind)
        })
    }
}
