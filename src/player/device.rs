//! Audio output device boundary.
//!
//! The engine is the only caller of an [`AudioDevice`]. Everything the
//! device reports back arrives as a [`DeviceEvent`] fed into
//! [`PlaybackEngine::handle_event`](super::PlaybackEngine::handle_event).

use thiserror::Error;

/// Identifies one play request.
///
/// The generation is bumped on every play request, pause and track load, so
/// a resolution carrying an older generation belongs to a request the user
/// has already moved past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket {
    pub generation: u64,
    /// Queue index the request was issued for
    pub index: usize,
}

/// Playback failures reported by a device.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("unsupported source: {0}")]
    Unsupported(String),

    #[error("source failed to load: {0}")]
    Load(String),

    #[error("playback was rejected: {0}")]
    Rejected(String),
}

/// Notifications from the device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A previously issued play request finished
    PlayResolved {
        ticket: PlayTicket,
        result: Result<(), PlaybackError>,
    },
    /// The current source played to its end; carries the ticket of the
    /// last play request the device received
    Ended { ticket: PlayTicket },
    /// Playback position in seconds
    TimeUpdate(f64),
    /// Source duration in seconds became known
    DurationChange(f64),
}

/// An audio output that plays one source at a time.
///
/// `play` is asynchronous: the device answers later with
/// [`DeviceEvent::PlayResolved`] carrying the same ticket.
///
/// `TimeUpdate` and `DurationChange` always describe the source most
/// recently passed to `load`; a device must not emit them for a source it
/// has replaced.
pub trait AudioDevice: Send {
    /// Load `src` as the current source, replacing any other.
    fn load(&mut self, src: &str) -> Result<(), PlaybackError>;

    /// Start or resume playback of the loaded source.
    fn play(&mut self, ticket: PlayTicket);

    fn pause(&mut self);

    /// Move the playhead, in seconds.
    fn seek(&mut self, secs: f64);

    /// Current playhead in seconds.
    fn position(&self) -> f64;

    /// Volume level (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);
}
