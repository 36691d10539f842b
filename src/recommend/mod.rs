//! Mood-based search suggestions.
//!
//! `POST /recommend` turns free text plus optional language and mood tags
//! into a short list of search queries. Sentiment inference is best-effort:
//! without a credential, or when the sentiment service fails, the answer
//! comes straight from the [`fallback`] tables. The endpoint never fails.

pub mod fallback;
pub mod sentiment;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use fallback::fallback_queries;
pub use sentiment::{GoogleSentimentClient, SentimentApi};

/// Longest text forwarded for sentiment analysis, in characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Scores above this infer an upbeat mood.
const UPBEAT_THRESHOLD: f32 = 0.25;

/// Scores below this infer a calm mood.
const CALM_THRESHOLD: f32 = -0.25;

/// Errors from the sentiment service
#[derive(Debug, Clone, Error)]
pub enum RecommendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Sentiment service returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Suggestion language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Telugu,
    #[default]
    English,
    Tamil,
    Hindi,
    Kannada,
    Malayalam,
    /// Language-neutral suggestions
    All,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Self::Telugu,
        Self::English,
        Self::Tamil,
        Self::Hindi,
        Self::Kannada,
        Self::Malayalam,
        Self::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telugu => "telugu",
            Self::English => "english",
            Self::Tamil => "tamil",
            Self::Hindi => "hindi",
            Self::Kannada => "kannada",
            Self::Malayalam => "malayalam",
            Self::All => "all",
        }
    }

    /// Parse a language tag; unknown tags fall back to English.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(tag))
            .unwrap_or_default()
    }
}

/// Listening mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Upbeat,
    Calm,
    #[default]
    Neutral,
    Romantic,
    Sad,
    Focus,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Self::Upbeat,
        Self::Calm,
        Self::Neutral,
        Self::Romantic,
        Self::Sad,
        Self::Focus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upbeat => "upbeat",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
            Self::Romantic => "romantic",
            Self::Sad => "sad",
            Self::Focus => "focus",
        }
    }

    /// Parse a mood tag; unknown tags count as no mood.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(tag))
    }

    /// Infer a mood from a sentiment score in `[-1, 1]`.
    pub fn from_score(score: f32) -> Self {
        if score > UPBEAT_THRESHOLD {
            Self::Upbeat
        } else if score < CALM_THRESHOLD {
            Self::Calm
        } else {
            Self::Neutral
        }
    }

    /// Row of this mood in the fallback tables.
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Upbeat => 0,
            Self::Calm => 1,
            Self::Neutral => 2,
            Self::Romantic => 3,
            Self::Sad => 4,
            Self::Focus => 5,
        }
    }
}

/// Body of `POST /recommend`. Tags stay raw strings so unknown values
/// degrade instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendResponse {
    pub queries: Vec<String>,
}

/// Produces search suggestions, optionally informed by sentiment analysis.
pub struct Recommender {
    sentiment: Option<Arc<dyn SentimentApi>>,
}

impl Recommender {
    /// Create a recommender. Without a sentiment service every answer is a
    /// fallback row.
    pub fn new(sentiment: Option<Arc<dyn SentimentApi>>) -> Self {
        Self { sentiment }
    }

    /// Create a recommender from an optional Google API key.
    pub fn from_api_key(api_key: Option<&str>) -> Self {
        let sentiment = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Arc::new(GoogleSentimentClient::new(key)) as Arc<dyn SentimentApi>);
        Self::new(sentiment)
    }

    /// Whether sentiment inference is available.
    pub fn has_sentiment(&self) -> bool {
        self.sentiment.is_some()
    }

    /// Recommend from a raw request body; a malformed body gets the
    /// English/neutral row.
    pub async fn recommend_raw(&self, body: &[u8]) -> RecommendResponse {
        match serde_json::from_slice::<RecommendRequest>(body) {
            Ok(request) => self.recommend(request).await,
            Err(e) => {
                tracing::debug!("Malformed recommend body: {}", e);
                RecommendResponse {
                    queries: fallback_queries(Language::English, Mood::Neutral),
                }
            }
        }
    }

    /// Recommend from a parsed request.
    pub async fn recommend(&self, request: RecommendRequest) -> RecommendResponse {
        let language = request
            .language
            .as_deref()
            .map(Language::parse)
            .unwrap_or_default();
        let client_mood = request.mood.as_deref().and_then(Mood::parse);
        let text: String = request
            .text
            .unwrap_or_default()
            .chars()
            .take(MAX_TEXT_CHARS)
            .collect();

        let mood = match (&self.sentiment, text.trim().is_empty()) {
            (Some(sentiment), false) => match sentiment.score(&text).await {
                // The client's own mood wins over the inferred one
                Ok(score) => client_mood.unwrap_or_else(|| Mood::from_score(score)),
                Err(e) => {
                    tracing::warn!("Sentiment analysis failed, using fallback: {}", e);
                    client_mood.unwrap_or_default()
                }
            },
            _ => client_mood.unwrap_or_default(),
        };

        RecommendResponse {
            queries: fallback_queries(language, mood),
        }
    }
}
