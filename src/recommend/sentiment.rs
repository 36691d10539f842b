//! Google Cloud Natural Language sentiment client.
//!
//! See: https://cloud.google.com/natural-language/docs/reference/rest/v1/documents/analyzeSentiment

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::RecommendError;

const DEFAULT_BASE_URL: &str = "https://language.googleapis.com";

/// Sentiment analysis of free text.
#[async_trait]
pub trait SentimentApi: Send + Sync {
    /// Document sentiment score in `[-1, 1]`.
    async fn score(&self, text: &str) -> Result<f32, RecommendError>;
}

// Request/response shapes of `documents:analyzeSentiment`

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    document_sentiment: Option<DocumentSentiment>,
}

#[derive(Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: Option<f32>,
}

/// Google Natural Language API client
pub struct GoogleSentimentClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleSentimentClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Analyze `text`; a response without a score counts as neutral (0.0).
    pub async fn analyze(&self, text: &str) -> Result<f32, RecommendError> {
        let url = format!(
            "{}/v1/documents:analyzeSentiment?key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        let body = AnalyzeRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecommendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecommendError::UpstreamStatus(status.as_u16()));
        }

        let parsed = response
            .json::<AnalyzeResponse>()
            .await
            .map_err(|e| RecommendError::Parse(e.to_string()))?;

        Ok(parsed
            .document_sentiment
            .and_then(|s| s.score)
            .unwrap_or(0.0))
    }
}

#[async_trait]
impl SentimentApi for GoogleSentimentClient {
    async fn score(&self, text: &str) -> Result<f32, RecommendError> {
        self.analyze(text).await
    }
}
