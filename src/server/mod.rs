//! HTTP server: search, media proxy, download relay and recommendations.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /search/{kind}?query=` | one search kind |
//! | `GET /search?query=` | all kinds concurrently |
//! | `GET /media?src=` | [`crate::proxy::media`] |
//! | `GET /download?src=&filename=` | [`crate::proxy::download`] |
//! | `POST /recommend` | mood suggestions |
//! | `GET /health` | liveness |

mod error;
mod recommend;
mod search;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::proxy::{DOWNLOAD_ROUTE, MEDIA_ROUTE, ProxySettings, download, media};
use crate::recommend::Recommender;
use crate::search::{SearchAggregator, UpstreamSearchClient};

pub use error::ApiError;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Client for proxy and relay fetches
    pub http: reqwest::Client,
    pub proxy: ProxySettings,
    pub search: Arc<SearchAggregator>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    /// Build the state from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let upstream = UpstreamSearchClient::new(&config.upstream)?;
        let recommender =
            Recommender::from_api_key(config.credentials.sentiment_api_key.as_deref());
        if !recommender.has_sentiment() {
            tracing::info!("No sentiment API key configured, suggestions use fallback tables");
        }

        Ok(Self {
            http: reqwest::Client::new(),
            proxy: ProxySettings::from(&config.proxy),
            search: Arc::new(SearchAggregator::new(Arc::new(upstream))),
            recommender: Arc::new(recommender),
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search::overview))
        .route("/search/{kind}", get(search::search))
        .route(MEDIA_ROUTE, get(media::media))
        .route(DOWNLOAD_ROUTE, get(download::download))
        .route("/recommend", post(recommend::recommend))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let addr: SocketAddr = config.server.bind.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {:?}: {}", config.server.bind, e),
        )
    })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(format!("binding {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context("server terminated")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
