//! Trait definition for the upstream search API.
//!
//! Production code uses [`UpstreamSearchClient`](super::UpstreamSearchClient);
//! tests substitute [`mocks::MockSearchApi`].

use async_trait::async_trait;
use serde_json::Value;

use super::{SearchError, SearchKind};

/// Raw access to the upstream search endpoints.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetch the raw upstream response body for one kind.
    async fn fetch(&self, kind: SearchKind, query: &str) -> Result<Value, SearchError>;
}

#[async_trait]
impl SearchApi for super::client::UpstreamSearchClient {
    async fn fetch(&self, kind: SearchKind, query: &str) -> Result<Value, SearchError> {
        self.fetch(kind, query).await
    }
}
