//! Download relay: one-shot full-body relay with attachment disposition.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;
use serde::Deserialize;

use super::parse_target;
use crate::server::{ApiError, AppState};

/// Filename used when none is given or sanitization leaves nothing.
pub const DEFAULT_FILENAME: &str = "track.mp3";

/// Query of `/download`.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub src: Option<String>,
    pub filename: Option<String>,
}

/// Strip quotes, path separators and control characters from a filename.
///
/// The result is safe to embed in a quoted `content-disposition` value.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '"' | '/' | '\\') && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// `GET /download?src=<url>&filename=<name>`.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let target = query
        .src
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::input("Missing or invalid src"))
        .and_then(|raw| {
            parse_target(raw).map_err(|_| ApiError::input("Missing or invalid src"))
        })?;
    let filename = sanitize_filename(query.filename.as_deref().unwrap_or(DEFAULT_FILENAME));

    tracing::debug!("Relaying download {} as {}", target, filename);

    let upstream = state
        .http
        .get(target.clone())
        .header(header::USER_AGENT, state.proxy.user_agent.as_str())
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("Download fetch error for {}: {}", target, e);
            ApiError::Fetch(e.to_string())
        })?;

    let status = upstream.status();
    if !status.is_success() {
        tracing::warn!("Download upstream returned {} for {}", status, target);
        // Only error statuses are meaningful to relay
        let relayed = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::BAD_GATEWAY
        };
        return Err(ApiError::UpstreamStatus(relayed));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("audio/mpeg"));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|_| ApiError::input("Invalid filename"))?;

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{spawn_stub, test_state};
    use axum::Router;
    use axum::routing::get;

    fn stub_router() -> Router {
        Router::new()
            .route(
                "/file.mp3",
                get(|| async {
                    let mut response = Response::new(Body::from("mp3-bytes"));
                    response
                        .headers_mut()
                        .insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
                    response
                }),
            )
            .route("/bare", get(|| async { Response::new(Body::from("bytes")) }))
            .route("/gone", get(|| async { (StatusCode::GONE, "gone") }))
    }

    fn query(src: &str, filename: Option<&str>) -> Query<DownloadQuery> {
        Query(DownloadQuery {
            src: Some(src.to_string()),
            filename: filename.map(str::to_string),
        })
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My \"Song\".mp3"), "My Song.mp3");
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("a\\b\r\nc.mp3"), "abc.mp3");
        assert_eq!(sanitize_filename("\"/\\"), DEFAULT_FILENAME);
        assert_eq!(sanitize_filename("   "), DEFAULT_FILENAME);
    }

    #[tokio::test]
    async fn test_relays_with_attachment() {
        let addr = spawn_stub(stub_router()).await;
        let response = download(
            State(test_state()),
            query(&format!("http://{}/file.mp3", addr), Some("Song / Artist.mp3")),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let h = response.headers();
        assert_eq!(h[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(
            h[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Song  Artist.mp3\""
        );
        assert_eq!(h[header::CACHE_CONTROL], "no-store");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"mp3-bytes");
    }

    #[tokio::test]
    async fn test_default_filename_and_content_type() {
        let addr = spawn_stub(stub_router()).await;
        let response = download(State(test_state()), query(&format!("http://{}/bare", addr), None))
            .await
            .unwrap();

        let h = response.headers();
        assert_eq!(h[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(h[header::CONTENT_DISPOSITION], "attachment; filename=\"track.mp3\"");
    }

    #[tokio::test]
    async fn test_upstream_status_is_relayed() {
        let addr = spawn_stub(stub_router()).await;
        let err = download(State(test_state()), query(&format!("http://{}/gone", addr), None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn test_rejects_non_http_before_fetch() {
        for src in ["ftp://host/a.mp3", "/media?src=x", "nonsense", ""] {
            let err = download(State(test_state()), query(src, None))
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "src {:?}", src);
        }

        let err = download(State(test_state()), Query(DownloadQuery::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Input(ref m) if m == "Missing or invalid src"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Sanitized names never contain characters that break the header
        #[test]
        fn sanitized_names_are_header_safe(name in any::<String>()) {
            let clean = sanitize_filename(&name);
            prop_assert!(!clean.is_empty());
            prop_assert!(!clean.contains(['"', '/', '\\']));
            prop_assert!(!clean.chars().any(char::is_control));
        }
    }
}
