//! User-created playlists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError, read_typed, write_typed};
use crate::model::Track;

pub const PLAYLISTS_KEY: &str = "user:playlists";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Creation time in epoch milliseconds, as a string
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub songs: Vec<Track>,
    /// Epoch milliseconds
    pub created_at: i64,
}

pub struct Playlists {
    store: Arc<dyn KeyValueStore>,
}

impl Playlists {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All playlists in creation order. A malformed list reads as empty.
    pub fn list(&self) -> Result<Vec<Playlist>, StoreError> {
        Ok(read_typed(self.store.as_ref(), PLAYLISTS_KEY)?.unwrap_or_default())
    }

    /// Create an empty playlist named `name` (trimmed).
    pub fn create(&self, name: &str) -> Result<Playlist, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("playlist name is empty".to_string()));
        }

        let mut playlists = self.list()?;
        let now = chrono::Utc::now().timestamp_millis();

        // Two creations within one millisecond must not share an id
        let mut stamp = now;
        while playlists.iter().any(|p| p.id == stamp.to_string()) {
            stamp += 1;
        }

        let playlist = Playlist {
            id: stamp.to_string(),
            name: name.to_string(),
            songs: Vec::new(),
            created_at: now,
        };
        playlists.push(playlist.clone());
        self.save(&playlists)?;

        tracing::debug!("Created playlist {} ({})", playlist.name, playlist.id);
        Ok(playlist)
    }

    /// Delete a playlist; returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut playlists = self.list()?;
        let before = playlists.len();
        playlists.retain(|p| p.id != id);
        if playlists.len() == before {
            return Ok(false);
        }
        self.save(&playlists)?;
        Ok(true)
    }

    /// Append `track` to playlist `id`. Duplicates are allowed.
    pub fn add_song(&self, id: &str, track: Track) -> Result<Playlist, StoreError> {
        let mut playlists = self.list()?;
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("playlist {}", id)))?;
        playlist.songs.push(track);
        let updated = playlist.clone();
        self.save(&playlists)?;
        Ok(updated)
    }

    fn save(&self, playlists: &[Playlist]) -> Result<(), StoreError> {
        write_typed(self.store.as_ref(), PLAYLISTS_KEY, &playlists)
    }
}
