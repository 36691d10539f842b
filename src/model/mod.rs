//! Core data model shared by search, the player and the persisted lists.
//!
//! [`Track`] is the canonical record every upstream song shape is mapped
//! into by [`crate::normalize`]. It is immutable once built: the player and
//! the stores only ever clone it.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::proxy::{DOWNLOAD_ROUTE, MEDIA_ROUTE};

/// Title used when no upstream title candidate is present.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Artist used when no upstream artist candidate is present.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A normalized, playable-or-listable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Upstream id, or a generated one when the record has none
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Cover art; a placeholder is chosen at render time, never here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Proxied (or relative) audio locator. `None` means the track is inert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u32>,
}

impl Track {
    /// Create a track with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            image_url: None,
            audio_url: None,
            duration_sec: None,
        }
    }

    /// Whether the track can be enqueued for playback.
    pub fn is_playable(&self) -> bool {
        self.audio_url.is_some()
    }

    /// Recover the original upstream locator behind the proxied audio URL.
    ///
    /// Absolute http(s) locators are returned as-is; relative locators that
    /// do not point at the media route have no recoverable origin.
    pub fn source_url(&self) -> Option<String> {
        let audio = self.audio_url.as_deref()?;

        if audio.starts_with(MEDIA_ROUTE)
            && let Some(url) = local_url(audio)
            && url.path() == MEDIA_ROUTE
        {
            return query_param(&url, "src").or_else(|| query_param(&url, "url"));
        }

        let lower = audio.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Some(audio.to_string());
        }
        None
    }

    /// Build the download relay link for this track, named after its title.
    pub fn download_href(&self) -> Option<String> {
        let source = self.source_url()?;
        let stem = if self.title.trim().is_empty() {
            "track"
        } else {
            self.title.as_str()
        };
        let filename = format!("{}.mp3", stem);
        Some(format!(
            "{}?src={}&filename={}",
            DOWNLOAD_ROUTE,
            urlencoding::encode(&source),
            urlencoding::encode(&filename)
        ))
    }
}

/// Resolve a server-relative path against a placeholder origin.
fn local_url(path: &str) -> Option<Url> {
    Url::parse("http://localhost").ok()?.join(path).ok()
}

/// First non-empty value of `key`, percent-decoded.
fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
