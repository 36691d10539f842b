//! Player state, command and event types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::Track;

/// Current playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Empty queue
    #[default]
    Idle,
    /// Queue loaded, not playing
    Ready,
    /// Play requested, device has not confirmed yet
    Loading,
    Playing,
    Paused,
}

impl PlaybackStatus {
    /// Only a confirmed play counts as playing.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Repeat mode for the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    /// Repeat current track
    One,
    /// Repeat entire queue
    All,
}

impl RepeatMode {
    /// Next mode in the `off -> one -> all -> off` cycle.
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

/// Observable transport snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportState {
    pub status: PlaybackStatus,
    pub is_playing: bool,
    pub current_time_sec: f64,
    pub duration_sec: f64,
    /// Volume level (0.0 - 1.0)
    pub volume: f32,
    pub shuffle: bool,
    pub repeat_mode: RepeatMode,
    pub current_index: Option<usize>,
    pub queue_len: usize,
}

impl TransportState {
    /// Get position as a fraction (0.0 - 1.0).
    pub fn position_fraction(&self) -> f64 {
        if self.duration_sec <= 0.0 {
            0.0
        } else {
            (self.current_time_sec / self.duration_sec).clamp(0.0, 1.0)
        }
    }

    /// Format position as MM:SS.
    pub fn position_str(&self) -> String {
        format_duration(secs_to_duration(self.current_time_sec))
    }

    /// Format duration as MM:SS.
    pub fn duration_str(&self) -> String {
        format_duration(secs_to_duration(self.duration_sec))
    }
}

/// Seconds as reported by a device; out-of-range values format as zero.
fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_default()
}

/// Format a duration as MM:SS or HH:MM:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Commands accepted by the playback engine.
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Replace the queue and start playing at `start`
    LoadQueue { tracks: Vec<Track>, start: usize },
    /// Start/resume playback
    Play,
    /// Pause playback
    Pause,
    Toggle,
    Next,
    Prev,
    /// Seek to position in seconds
    Seek(f64),
    /// Volume level (0.0 - 1.0)
    SetVolume(f32),
    ToggleShuffle,
    CycleRepeat,
    /// Append to the queue
    Add(Track),
    /// Jump to a queue index and play
    PlayAt(usize),
    /// Remove a queue index
    Remove(usize),
    Clear,
}

/// Notifications published by the playback engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The current track changed (`None` once the queue is emptied)
    TrackChanged {
        index: Option<usize>,
        track: Option<Track>,
    },
    StatusChanged(PlaybackStatus),
    /// User-facing message, e.g. a track that could not be played
    Advisory(String),
}
