//! Audio locator selection and media-proxy rewriting.

use serde_json::Value;

use super::lookup::lookup;
use crate::proxy::{MEDIA_ROUTE, parse_target};

/// Fields that hold explicit download/quality variants.
///
/// Each may be a string, an object with `url`/`link`/`href`, or an array
/// of either (`[{quality: "320kbps", url: ...}, ...]`).
pub const VARIANT_PATHS: &[&str] = &["downloadUrl", "download_url", "downloadUrls"];

/// Flat fields that may hold a stream locator. Only values that look like
/// audio are accepted from these.
pub const STREAM_PATHS: &[&str] = &[
    "audioUrl",
    "audio",
    "stream_url",
    "streamUrl",
    "mp3Url",
    "media_url",
    "media.url",
    "audio.url",
    "preview_url",
    "previewUrl",
    "songUrl",
    "song_url",
    "streams.0.url",
    "links.stream",
];

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "ogg", "wav", "flac", "opus"];

/// Quality markers, best first.
const QUALITY_MARKERS: &[&str] = &["320", "160", "128"];

/// A candidate locator with the label used to rank its quality.
#[derive(Debug, Clone)]
struct Variant {
    url: String,
    label: String,
}

impl Variant {
    fn rank(&self) -> usize {
        quality_rank(&self.label)
    }
}

/// Higher is better; unlabelled variants rank 0.
pub fn quality_rank(label: &str) -> usize {
    QUALITY_MARKERS
        .iter()
        .position(|marker| label.contains(marker))
        .map(|pos| QUALITY_MARKERS.len() - pos)
        .unwrap_or(0)
}

/// Whether a locator plausibly points at an audio resource.
pub fn looks_like_audio(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or("");
    let has_extension = path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| AUDIO_EXTENSIONS.contains(&ext));
    has_extension || lower.contains("mp3") || lower.contains("audio")
}

/// Pick the best upstream audio locator from a raw record.
///
/// Explicit variants win, highest quality first (ties keep upstream order).
/// Otherwise the flat stream fields are ranked the same way and the first
/// one that looks like audio is taken.
pub fn pick_audio_source(raw: &Value) -> Option<String> {
    let variants = collect_variants(raw);
    if let Some(best) = best_ranked(&variants) {
        return Some(best.url.clone());
    }

    let mut streams: Vec<Variant> = STREAM_PATHS
        .iter()
        .filter_map(|path| lookup(raw, path)?.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(|s| Variant {
            url: s.to_string(),
            label: s.to_string(),
        })
        .collect();
    // Stable sort keeps upstream order among equal ranks
    streams.sort_by_key(|v| std::cmp::Reverse(v.rank()));

    streams
        .into_iter()
        .find(|v| looks_like_audio(&v.url))
        .map(|v| v.url)
}

/// Route a resolved locator through the media proxy.
///
/// Absolute http(s) locators are rewritten; already-proxied and relative
/// locators pass through; anything else is unusable.
pub fn proxy_locator(locator: &str) -> Option<String> {
    let locator = locator.trim();
    if locator.is_empty() {
        return None;
    }
    if locator.starts_with('/') {
        return Some(locator.to_string());
    }

    // Same acceptance rule as the proxy, so a rewritten locator never 400s
    parse_target(locator).ok()?;
    Some(format!(
        "{}?src={}",
        MEDIA_ROUTE,
        urlencoding::encode(locator)
    ))
}

/// Resolve the playable, proxied audio URL of a raw record.
pub fn resolve_audio(raw: &Value) -> Option<String> {
    // Records that were already normalized server-side carry `src`
    if let Some(src) = lookup(raw, "src").and_then(Value::as_str)
        && let Some(url) = proxy_locator(src)
    {
        return Some(url);
    }
    pick_audio_source(raw).and_then(|src| proxy_locator(&src))
}

fn collect_variants(raw: &Value) -> Vec<Variant> {
    let mut out = Vec::new();
    for path in VARIANT_PATHS {
        match lookup(raw, path) {
            Some(Value::Array(items)) => out.extend(items.iter().filter_map(variant_from)),
            Some(other) => out.extend(variant_from(other)),
            None => {}
        }
    }
    out
}

fn variant_from(value: &Value) -> Option<Variant> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Variant {
            url: s.clone(),
            label: s.clone(),
        }),
        Value::Object(_) => {
            let url = ["url", "link", "href"]
                .iter()
                .find_map(|k| lookup(value, k)?.as_str())
                .filter(|s| !s.trim().is_empty())?
                .to_string();
            let label = ["quality", "bitrate"]
                .iter()
                .find_map(|k| match lookup(value, k)? {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| url.clone());
            Some(Variant { url, label })
        }
        _ => None,
    }
}

/// Highest rank, first occurrence on ties.
fn best_ranked(variants: &[Variant]) -> Option<&Variant> {
    variants
        .iter()
        .fold(None, |best: Option<&Variant>, v| match best {
            Some(b) if b.rank() >= v.rank() => Some(b),
            _ => Some(v),
        })
}
