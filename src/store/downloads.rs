//! Download history: a capped, most-recent-first list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError, read_typed, write_typed};
use crate::model::Track;

pub const DOWNLOADS_KEY: &str = "downloads:list";

/// Entries kept; older ones fall off the end.
pub const MAX_DOWNLOADS: usize = 100;

/// One download, as recorded when the user requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub url: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub at: Option<i64>,
}

pub struct DownloadHistory {
    store: Arc<dyn KeyValueStore>,
}

impl DownloadHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record a download of `track` from `href` at the front of the list.
    pub fn record(&self, track: &Track, href: &str) -> Result<DownloadRecord, StoreError> {
        let record = DownloadRecord {
            id: Some(track.id.clone()),
            title: Some(track.title.clone()),
            artist: Some(track.artist.clone()),
            image_url: track.image_url.clone(),
            url: href.to_string(),
            at: Some(chrono::Utc::now().timestamp_millis()),
        };

        let mut list = self.list()?;
        list.insert(0, record.clone());
        list.truncate(MAX_DOWNLOADS);
        write_typed(self.store.as_ref(), DOWNLOADS_KEY, &list)?;
        Ok(record)
    }

    /// Recorded downloads, most recent first. A malformed list reads as empty.
    pub fn list(&self) -> Result<Vec<DownloadRecord>, StoreError> {
        Ok(read_typed(self.store.as_ref(), DOWNLOADS_KEY)?.unwrap_or_default())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(DOWNLOADS_KEY)
    }
}
