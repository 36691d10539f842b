//! HTTP boundary errors.
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as a JSON
//! body `{ "error": ..., "status"?: ..., "url"?: ... }` so nothing reaching
//! the boundary can fault the server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::search::SearchError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad or missing input (400)
    #[error("{0}")]
    Input(String),

    /// Upstream answered non-OK or without a body (502)
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        url: Option<String>,
    },

    /// Upstream status relayed as-is (download relay)
    #[error("Upstream failed")]
    UpstreamStatus(StatusCode),

    /// Upstream did not answer within the deadline (504)
    #[error("Upstream timeout")]
    Timeout,

    /// Any other fetch failure (502)
    #[error("{0}")]
    Fetch(String),
}

impl ApiError {
    /// Create an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Input(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamStatus(status) => *status,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let (status, url) = match &self {
            Self::Upstream { status, url, .. } => (*status, url.clone()),
            Self::UpstreamStatus(status) => (Some(status.as_u16()), None),
            _ => (None, None),
        };
        let body = ErrorBody {
            error: self.to_string(),
            status,
            url,
        };
        (code, Json(body)).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidKind(_) => Self::input("Invalid type"),
            SearchError::UpstreamStatus { status } => Self::Upstream {
                message: "Upstream error".to_string(),
                status: Some(status),
                url: None,
            },
            SearchError::Network(message) | SearchError::Parse(message) => Self::Fetch(message),
        }
    }
}
