//! Test utilities and fixtures for tunebridge tests.
//!
//! This module provides common test helpers, mock factories, and
//! HTTP stub utilities to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{spawn_stub, test_state};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let addr = spawn_stub(Router::new().route("/a.mp3", get(|| async { "ok" }))).await;
//!     let state = test_state();
//!     // ... test logic
//! }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use serde_json::{Value, json};

use crate::model::Track;
use crate::player::{AudioDevice, PlayTicket, PlaybackError};
use crate::proxy::ProxySettings;
use crate::recommend::Recommender;
use crate::search::SearchAggregator;
use crate::search::traits::mocks::MockSearchApi;
use crate::server::AppState;

/// Creates a playable track with predictable fields.
///
/// Title is `Title {id}`, artist `Artist {id}`, the audio locator points
/// through the media proxy and the duration is three minutes.
pub fn track(id: &str) -> Track {
    Track {
        audio_url: Some(format!(
            "/media?src=https%3A%2F%2Fcdn.example.com%2F{}.mp3",
            id
        )),
        image_url: Some(format!("https://img.example.com/{}-500x500.jpg", id)),
        duration_sec: Some(180),
        ..Track::new(id, format!("Title {}", id), format!("Artist {}", id))
    }
}

/// Creates a track with no playable audio.
pub fn inert_track(id: &str) -> Track {
    Track {
        audio_url: None,
        ..track(id)
    }
}

/// Creates an upstream song record in the common JioSaavn-like shape.
///
/// Title `Song {id}`, two quality variants (the 320kbps one wins) and a
/// duration given as a string of seconds.
pub fn raw_song(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Song {}", id),
        "primaryArtists": format!("Artist {}", id),
        "image": [
            { "quality": "50x50", "link": format!("https://img.example.com/{}-50x50.jpg", id) },
            { "quality": "150x150", "link": format!("https://img.example.com/{}-150x150.jpg", id) },
        ],
        "duration": "215",
        "downloadUrl": [
            { "quality": "96kbps", "url": format!("https://cdn.example.com/{}_96.mp4", id) },
            { "quality": "320kbps", "url": format!("https://cdn.example.com/{}_320.mp4", id) },
        ],
    })
}

/// Audio device that records every call.
///
/// Play requests are never resolved on their own; tests answer them with
/// [`DeviceEvent::PlayResolved`](crate::player::DeviceEvent::PlayResolved)
/// using [`MockDevice::last_ticket`].
#[derive(Debug, Default)]
pub struct MockDevice {
    pub loads: Vec<String>,
    pub tickets: Vec<PlayTicket>,
    pub pauses: usize,
    pub seeks: Vec<f64>,
    pub volume: f32,
    /// Reported playhead
    pub position: f64,
    /// Make every `load` fail
    pub fail_loads: bool,
}

impl MockDevice {
    pub fn last_ticket(&self) -> Option<PlayTicket> {
        self.tickets.last().copied()
    }
}

impl AudioDevice for MockDevice {
    fn load(&mut self, src: &str) -> Result<(), PlaybackError> {
        if self.fail_loads {
            return Err(PlaybackError::Load(src.to_string()));
        }
        self.loads.push(src.to_string());
        self.position = 0.0;
        Ok(())
    }

    fn play(&mut self, ticket: PlayTicket) {
        self.tickets.push(ticket);
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn seek(&mut self, secs: f64) {
        self.seeks.push(secs);
        self.position = secs;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

/// Serves `router` on an ephemeral local port.
pub async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub has no local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("No local address").port()
}

/// Application state backed by mocks: empty search results and
/// fallback-only recommendations.
pub fn test_state() -> AppState {
    AppState {
        http: reqwest::Client::new(),
        proxy: ProxySettings::default(),
        search: Arc::new(SearchAggregator::new(Arc::new(MockSearchApi::empty()))),
        recommender: Arc::new(Recommender::new(None)),
    }
}
