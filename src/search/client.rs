//! Upstream search API HTTP client.
//!
//! Endpoints are `{base}/{kind}?query=<q>` returning JSON of no fixed shape.

use std::time::Duration;

use serde_json::Value;

use super::{SearchError, SearchKind};
use crate::config::UpstreamConfig;

/// Upstream search API client
pub struct UpstreamSearchClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl UpstreamSearchClient {
    /// Create a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, SearchError> {
        Self::with_base_url(
            config.search_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw upstream response for one search kind.
    pub async fn fetch(&self, kind: SearchKind, query: &str) -> Result<Value, SearchError> {
        let url = format!(
            "{}/{}?query={}",
            self.base_url,
            kind,
            urlencoding::encode(query)
        );

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Search upstream returned {} for {}", status, kind);
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_stub;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn stub_router() -> Router {
        Router::new().route(
            "/api/search/{kind}",
            get(
                |Path(kind): Path<String>, Query(params): Query<HashMap<String, String>>| async move {
                    let query = params.get("query").cloned().unwrap_or_default();
                    if query == "explode" {
                        return Err(StatusCode::SERVICE_UNAVAILABLE);
                    }
                    Ok(Json(json!({"kind": kind, "data": {"results": [{"name": query}]}})))
                },
            ),
        )
    }

    #[tokio::test]
    async fn test_fetch_builds_kind_url_and_encodes_query() {
        let addr = spawn_stub(stub_router()).await;
        let client = UpstreamSearchClient::with_base_url(
            format!("http://{}/api/search/", addr),
            Duration::from_secs(5),
        )
        .unwrap();

        let body = client.fetch(SearchKind::Albums, "a & b").await.unwrap();
        assert_eq!(body["kind"], "albums");
        assert_eq!(body["data"]["results"][0]["name"], "a & b");
    }

    #[tokio::test]
    async fn test_fetch_maps_status() {
        let addr = spawn_stub(stub_router()).await;
        let client = UpstreamSearchClient::with_base_url(
            format!("http://{}/api/search", addr),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.fetch(SearchKind::Songs, "explode").await.unwrap_err();
        assert!(matches!(err, SearchError::UpstreamStatus { status: 503 }));
    }

    #[test]
    fn test_client_from_config() {
        let client = UpstreamSearchClient::new(&UpstreamConfig::default()).unwrap();
        assert_eq!(client.base_url, "https://devplay-ashy.vercel.app/api/search");
    }
}
