//! Deterministic suggestion tables keyed by `(language, mood)`.
//!
//! Rows follow [`Mood::ALL`] order.

use super::{Language, Mood};

type MoodTable = [[&'static str; 3]; 6];

/// Language-neutral suggestions, also used for [`Language::All`].
const BASE: MoodTable = [
    ["party hits", "energetic mix", "dance anthems"],
    ["acoustic chill", "soothing melodies", "late-night calm"],
    ["trending now", "new releases", "top hits today"],
    ["love ballads", "romantic hits", "soft love songs"],
    ["sad songs", "heartbreak mix", "melancholy vibes"],
    ["focus beats", "instrumental productivity", "deep work ambient"],
];

const TELUGU: MoodTable = [
    ["Telugu party hits", "DSP energetic Telugu", "Tollywood dance tracks"],
    ["Telugu acoustic", "Melodic Telugu chill", "Soothing Tollywood"],
    ["Trending Telugu", "New Telugu releases", "Top Tollywood today"],
    ["Romantic Telugu hits", "Telugu love ballads", "Tollywood romance"],
    ["Sad Telugu songs", "Tollywood heartbreak", "Emotional Telugu"],
    ["Telugu focus instrumentals", "Tollywood calm study", "Telugu lo-fi"],
];

const ENGLISH: MoodTable = [
    ["Pop bangers 2025", "EDM workout", "Upbeat indie pop"],
    ["Lo-fi beats", "Acoustic chill", "Ambient focus"],
    ["Top 50 Global", "Fresh finds", "New Music Friday"],
    ["Romantic pop", "Love ballads", "Soft pop love"],
    ["Sad pop", "Indie heartbreak", "Melancholy indie"],
    ["Deep focus", "Instrumental study", "Ambient work"],
];

const TAMIL: MoodTable = [
    ["Tamil kuthu hits", "Anirudh energy", "Kollywood dance"],
    ["Tamil melody", "Acoustic Kollywood", "Calm Tamil classics"],
    ["Trending Tamil", "New Tamil releases", "Top Kollywood today"],
    ["Romantic Tamil hits", "Kollywood love ballads", "Soft Tamil romance"],
    ["Sad Tamil songs", "Kollywood heartbreak", "Melancholy Tamil"],
    ["Tamil lo-fi", "Kollywood instrumentals", "Study Tamil vibes"],
];

const HINDI: MoodTable = [
    ["Bollywood party", "Punjabi pop hits", "Upbeat Hindi tracks"],
    ["Hindi acoustic", "Soulful ghazals", "Chill Bollywood"],
    ["Trending Hindi", "New Bollywood releases", "Top Bollywood today"],
    ["Romantic Bollywood", "Hindi love ballads", "Bollywood romance"],
    ["Sad Hindi songs", "Bollywood heartbreak", "Emotional Hindi"],
    ["Hindi focus", "Instrumental Bollywood", "Chill Hindi study"],
];

const KANNADA: MoodTable = [
    ["Kannada party hits", "Sandalwood dance", "Upbeat Kannada tracks"],
    ["Kannada acoustic", "Soothing Sandalwood", "Kannada chill"],
    ["Trending Kannada", "New Kannada releases", "Top Sandalwood today"],
    ["Romantic Kannada hits", "Kannada love ballads", "Sandalwood romance"],
    ["Sad Kannada songs", "Kannada heartbreak", "Emotional Kannada"],
    ["Kannada lo-fi", "Sandalwood instrumentals", "Study Kannada vibes"],
];

const MALAYALAM: MoodTable = [
    ["Malayalam party hits", "Mollywood dance", "Upbeat Malayalam"],
    ["Malayalam acoustic", "Soothing Mollywood", "Malayalam chill"],
    ["Trending Malayalam", "New Malayalam releases", "Top Mollywood today"],
    ["Romantic Malayalam", "Malayalam love ballads", "Mollywood romance"],
    ["Sad Malayalam songs", "Malayalam heartbreak", "Emotional Malayalam"],
    ["Malayalam lo-fi", "Mollywood instrumentals", "Study Malayalam vibes"],
];

fn table(language: Language) -> &'static MoodTable {
    match language {
        Language::Telugu => &TELUGU,
        Language::English => &ENGLISH,
        Language::Tamil => &TAMIL,
        Language::Hindi => &HINDI,
        Language::Kannada => &KANNADA,
        Language::Malayalam => &MALAYALAM,
        Language::All => &BASE,
    }
}

/// Suggested search queries for a language and mood.
pub fn fallback_queries(language: Language, mood: Mood) -> Vec<String> {
    table(language)[mood.index()]
        .iter()
        .map(|q| q.to_string())
        .collect()
}
