//! Play-queue engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   PlaybackEngine (one per session)              │
//! │   Owns the queue and transport, applies commands, persists volume│
//! └──────────────┬──────────────────────────────────▲───────────────┘
//!                │ load / play(ticket) / pause       │ DeviceEvent
//!                ▼                                   │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        AudioDevice                              │
//! │      Plays one source; resolves play requests asynchronously    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! State changes are published as [`PlayerEvent`]s on a crossbeam channel
//! obtained from [`PlaybackEngine::subscribe`].

mod device;
mod engine;
mod queue;
mod state;

pub use device::{AudioDevice, DeviceEvent, PlayTicket, PlaybackError};
pub use engine::{DEFAULT_VOLUME, PlaybackEngine, RESTART_THRESHOLD_SECS, VOLUME_KEY};
pub use queue::{PlayQueue, Step};
pub use state::{
    PlaybackStatus, PlayerCommand, PlayerEvent, RepeatMode, TransportState, format_duration,
};
