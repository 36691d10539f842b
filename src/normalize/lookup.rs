//! Key-path lookup over untyped upstream JSON.
//!
//! Upstream records have no schema, so every field is resolved from an
//! ordered table of candidate paths. A path is a dotted list of segments;
//! numeric segments index into arrays (`album.images.0.url`). New upstream
//! shapes are supported by appending paths to these tables.

use serde_json::Value;

/// Candidate paths for a track id.
pub const ID_PATHS: &[&str] = &["id", "_id", "songid", "trackId", "uid", "url"];

/// Candidate paths for a track title.
pub const TITLE_PATHS: &[&str] = &["title", "name", "trackName"];

/// Candidate paths for a track artist.
pub const ARTIST_PATHS: &[&str] = &[
    "artist",
    "primaryArtists",
    "artistName",
    "artist.name",
    "artists.0.name",
    "artists.0.title",
    "owner.name",
    "album.artist",
    "album.artistName",
    "album.artists.0.name",
];

/// Candidate paths for track cover art.
pub const IMAGE_PATHS: &[&str] = &[
    "imageUrl",
    "image.1.link",
    "image.1.url",
    "image.0.link",
    "image.0.url",
    "image",
    "thumb",
    "poster",
    "cover",
    "coverUrl",
    "cover_medium",
    "cover_big",
    "thumbnail",
    "thumbnailUrl",
    "artwork",
    "artworkUrl",
    "artworkUrl60",
    "artworkUrl100",
    "artworkUrl512",
    "album.image",
    "album.cover",
    "album.coverUrl",
    "album.thumbnailUrl",
    "album.artworkUrl",
    "album.images.0.url",
];

/// Candidate paths for album cover art (search results, not tracks).
pub const ALBUM_IMAGE_PATHS: &[&str] = &[
    "image.1.link",
    "image.1.url",
    "image.0.link",
    "image.0.url",
    "image.link",
    "image.url",
    "image",
    "imageUrl",
    "images.0.url",
];

/// Candidate paths for album artist.
pub const ALBUM_ARTIST_PATHS: &[&str] = &[
    "primaryArtists",
    "artist",
    "artistName",
    "artist.name",
    "artists.0.name",
];

/// Resolve a dotted path, treating `null` the same as a missing key.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(segment),
            _ => None,
        })
        .filter(|v| !v.is_null())
}

/// First candidate that holds a non-blank string.
pub fn first_string(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// First candidate that holds a non-blank string or a number (ids).
pub fn first_scalar(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
