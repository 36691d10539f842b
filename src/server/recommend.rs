//! Recommendation handler.

use axum::Json;
use axum::extract::State;
use bytes::Bytes;

use super::AppState;
use crate::recommend::RecommendResponse;

/// `POST /recommend`. The body is parsed leniently so a malformed one still
/// gets an answer.
pub async fn recommend(State(state): State<AppState>, body: Bytes) -> Json<RecommendResponse> {
    Json(state.recommender.recommend_raw(&body).await)
}
