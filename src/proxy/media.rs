//! Media proxy: seekable pass-through streaming of upstream audio.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::Response;
use reqwest::Url;
use serde::Deserialize;

use super::{ProxySettings, parse_target};
use crate::server::{ApiError, AppState};

/// Response headers relayed from upstream.
const PASSTHROUGH_HEADERS: [HeaderName; 7] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::ACCEPT_RANGES,
    header::CONTENT_RANGE,
    header::CONTENT_DISPOSITION,
    header::ETAG,
    header::LAST_MODIFIED,
];

const ACCEPT_AUDIO: &str = "audio/*,application/octet-stream,*/*;q=0.8";

/// Query of `/media`; `url` is accepted as an alias of `src`.
#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub src: Option<String>,
    pub url: Option<String>,
}

/// `GET /media?src=<url>` with optional `Range`.
pub async fn media(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let raw = query
        .src
        .or(query.url)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::input("Missing src"))?;

    // Links are sometimes encoded twice; fall back to the raw value
    let decoded = urlencoding::decode(&raw)
        .map(|d| d.into_owned())
        .unwrap_or(raw);
    let target = parse_target(&decoded)?;

    fetch_media(
        &state.http,
        &state.proxy,
        target,
        headers.get(header::RANGE).cloned(),
    )
    .await
}

/// Fetch `target` and turn the upstream answer into a streaming response.
///
/// The deadline covers obtaining the response head only; once headers
/// arrive the body streams for as long as the client keeps reading.
pub async fn fetch_media(
    client: &reqwest::Client,
    settings: &ProxySettings,
    target: Url,
    range: Option<HeaderValue>,
) -> Result<Response, ApiError> {
    let origin = target.origin().ascii_serialization();

    let mut request = client
        .get(target.clone())
        .header(header::USER_AGENT, settings.user_agent.as_str())
        .header(header::ACCEPT, ACCEPT_AUDIO)
        .header(header::REFERER, format!("{}/", origin))
        .header(header::ORIGIN, origin.as_str());
    if let Some(range) = range {
        request = request.header(header::RANGE, range);
    }

    tracing::debug!("Proxying {}", target);

    let upstream = match tokio::time::timeout(settings.timeout, request.send()).await {
        Err(_) => {
            tracing::warn!("Upstream timeout after {:?}: {}", settings.timeout, target);
            return Err(ApiError::Timeout);
        }
        Ok(Err(e)) if e.is_timeout() => return Err(ApiError::Timeout),
        Ok(Err(e)) => {
            tracing::warn!("Upstream fetch error for {}: {}", target, e);
            return Err(ApiError::Fetch(e.to_string()));
        }
        Ok(Ok(response)) => response,
    };

    let status = upstream.status();
    if !status.is_success() || status == StatusCode::NO_CONTENT {
        tracing::warn!("Upstream returned {} for {}", status, target);
        return Err(ApiError::Upstream {
            message: "Upstream fetch failed".to_string(),
            status: Some(status.as_u16()),
            url: Some(target.to_string()),
        });
    }

    let headers = relay_headers(upstream.headers());
    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Copy whitelisted headers and fill in streaming defaults.
fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in PASSTHROUGH_HEADERS {
        if let Some(value) = upstream.get(&name) {
            headers.insert(name, value.clone());
        }
    }

    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    }
    if !headers.contains_key(header::ACCEPT_RANGES) {
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    }
    // Pass-through, not a cache
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers
}
