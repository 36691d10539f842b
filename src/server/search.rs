//! Search handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::search::{SearchHits, SearchKind, SearchOverview};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: SearchHits,
    pub query: String,
}

/// `GET /search/{kind}?query=`
pub async fn search(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let kind: SearchKind = kind.parse()?;
    let data = state.search.search(kind, &params.query).await?;
    Ok(Json(SearchResponse {
        data,
        query: params.query,
    }))
}

/// `GET /search?query=`
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchOverview> {
    Json(state.search.search_all(&params.query).await)
}
