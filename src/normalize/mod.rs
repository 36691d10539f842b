//! Track normalization - maps arbitrary upstream records into [`Track`].
//!
//! This is the ONLY place where untyped upstream JSON becomes our types.
//! Every field is resolved from the candidate tables in [`lookup`]; a
//! missing candidate degrades to a documented default, so normalization
//! never fails.
//!
//! | Field | Default when absent |
//! |-------|---------------------|
//! | `id` | generated identifier |
//! | `title` | `"Unknown Title"` |
//! | `artist` | `"Unknown Artist"` |
//! | `image_url` | `None` |
//! | `audio_url` | `None` (track is inert) |
//! | `duration_sec` | `None` |

pub mod audio;
pub mod duration;
pub mod image;
pub mod lookup;

use rand::Rng;
use serde_json::Value;

use crate::model::{Track, UNKNOWN_ARTIST, UNKNOWN_TITLE};

pub use audio::{looks_like_audio, pick_audio_source, proxy_locator, resolve_audio};
pub use duration::{parse_duration, resolve_duration};
pub use image::upgrade_thumbnail;

/// Normalize a single upstream song record.
pub fn normalize_track(raw: &Value) -> Track {
    let id = lookup::first_scalar(raw, lookup::ID_PATHS).unwrap_or_else(generate_id);
    let title =
        lookup::first_string(raw, lookup::TITLE_PATHS).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let artist = lookup::first_string(raw, lookup::ARTIST_PATHS)
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let image_url =
        lookup::first_string(raw, lookup::IMAGE_PATHS).map(|url| upgrade_thumbnail(&url));

    Track {
        id,
        title,
        artist,
        image_url,
        audio_url: resolve_audio(raw),
        duration_sec: resolve_duration(raw),
    }
}

/// Normalize a list of upstream song records.
pub fn normalize_tracks(items: &[Value]) -> Vec<Track> {
    items.iter().map(normalize_track).collect()
}

/// Annotate an upstream album record with `imageUrl` and `artist`.
///
/// The record is otherwise passed through untouched; non-object records
/// are returned as-is.
pub fn annotate_album(mut item: Value) -> Value {
    let image_url = lookup::first_string(&item, lookup::ALBUM_IMAGE_PATHS);
    let artist = lookup::first_string(&item, lookup::ALBUM_ARTIST_PATHS);

    if let Value::Object(map) = &mut item {
        map.insert(
            "imageUrl".to_string(),
            image_url.map(Value::String).unwrap_or(Value::Null),
        );
        map.insert(
            "artist".to_string(),
            artist.map(Value::String).unwrap_or(Value::Null),
        );
    }
    item
}

/// Identifier for records that carry none upstream.
fn generate_id() -> String {
    let mut rng = rand::rng();
    format!("gen-{:016x}{:016x}", rng.random::<u64>(), rng.random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_saavn_shape() {
        let raw = json!({
            "id": "abc123",
            "name": "Song Name",
            "primaryArtists": "Singer One, Singer Two",
            "duration": "215",
            "image": [
                {"quality": "50x50", "link": "https://c.saavncdn.com/x-50x50.jpg"},
                {"quality": "150x150", "link": "https://c.saavncdn.com/x-150x150.jpg"},
                {"quality": "500x500", "link": "https://c.saavncdn.com/x-500x500.jpg"}
            ],
            "downloadUrl": [
                {"quality": "12kbps", "link": "https://aac.saavncdn.com/x_12.mp4"},
                {"quality": "160kbps", "link": "https://aac.saavncdn.com/x_160.mp4"},
                {"quality": "320kbps", "link": "https://aac.saavncdn.com/x_320.mp4"}
            ]
        });

        let track = normalize_track(&raw);
        assert_eq!(track.id, "abc123");
        assert_eq!(track.title, "Song Name");
        assert_eq!(track.artist, "Singer One, Singer Two");
        assert_eq!(
            track.image_url.as_deref(),
            Some("https://c.saavncdn.com/x-500x500.jpg")
        );
        assert_eq!(
            track.audio_url.as_deref(),
            Some("/media?src=https%3A%2F%2Faac.saavncdn.com%2Fx_320.mp4")
        );
        assert_eq!(track.duration_sec, Some(215));
    }

    #[test]
    fn test_normalize_spotify_shape() {
        let raw = json!({
            "id": "sp1",
            "name": "Track",
            "artists": [{"name": "Band"}],
            "album": {"images": [{"url": "https://i.scdn.co/image/big"}]},
            "duration_ms": 201500,
            "preview_url": "https://p.scdn.co/mp3-preview/xyz"
        });

        let track = normalize_track(&raw);
        assert_eq!(track.artist, "Band");
        assert_eq!(track.image_url.as_deref(), Some("https://i.scdn.co/image/big"));
        assert_eq!(track.duration_sec, Some(202));
        assert!(track.audio_url.unwrap().starts_with("/media?src=https%3A%2F%2Fp.scdn.co"));
    }

    #[test]
    fn test_missing_everything_degrades_to_defaults() {
        let track = normalize_track(&json!({}));
        assert_eq!(track.title, UNKNOWN_TITLE);
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert!(track.id.starts_with("gen-"));
        assert_eq!(track.image_url, None);
        assert_eq!(track.audio_url, None);
        assert_eq!(track.duration_sec, None);
    }

    #[test]
    fn test_non_object_record() {
        let track = normalize_track(&json!("just a string"));
        assert_eq!(track.title, UNKNOWN_TITLE);
    }

    #[test]
    fn test_generated_ids_differ() {
        let tracks = normalize_tracks(&[json!({}), json!({})]);
        assert_ne!(tracks[0].id, tracks[1].id);
    }

    #[test]
    fn test_annotate_album() {
        let album = annotate_album(json!({
            "id": "al1",
            "title": "Album",
            "primaryArtists": "Composer",
            "image": [{"link": "small.jpg"}, {"link": "medium.jpg"}]
        }));
        assert_eq!(album["imageUrl"], "medium.jpg");
        assert_eq!(album["artist"], "Composer");
        assert_eq!(album["title"], "Album");
    }

    #[test]
    fn test_annotate_album_missing_fields_are_null() {
        let album = annotate_album(json!({"title": "Bare"}));
        assert!(album["imageUrl"].is_null());
        assert!(album["artist"].is_null());
        assert_eq!(annotate_album(json!(3)), json!(3));
    }
}
