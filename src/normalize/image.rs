//! Cover-art URL upgrades.

/// Low-resolution thumbnail markers and their high-resolution replacement.
pub const THUMBNAIL_UPGRADES: &[(&str, &str)] = &[("150x150", "500x500")];

/// Upgrade known thumbnail size markers (case-insensitive) in an image URL.
pub fn upgrade_thumbnail(url: &str) -> String {
    THUMBNAIL_UPGRADES
        .iter()
        .fold(url.to_string(), |acc, (from, to)| replace_ignore_case(&acc, from, to))
}

/// ASCII case-insensitive replace. Lowercasing ASCII keeps byte offsets, so
/// match positions in the lowered copy are valid in the original.
fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(&needle) {
        out.push_str(&haystack[last..start]);
        out.push_str(replacement);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}
