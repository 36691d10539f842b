//! The playback/queue engine.
//!
//! One engine exists per listening session and is the sole mutator of the
//! queue, the transport state and the audio device. Commands are plain
//! method calls (or [`PlayerCommand`]s through [`PlaybackEngine::dispatch`]);
//! device notifications come back through [`PlaybackEngine::handle_event`].
//!
//! Play requests resolve asynchronously. Each carries a [`PlayTicket`]
//! whose generation must still be the live one when the resolution arrives,
//! otherwise the resolution is stale (the user skipped or paused meanwhile)
//! and is dropped.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::device::{AudioDevice, DeviceEvent, PlayTicket, PlaybackError};
use super::queue::{PlayQueue, Step};
use super::state::{PlaybackStatus, PlayerCommand, PlayerEvent, RepeatMode, TransportState};
use crate::model::Track;
use crate::store::{KeyValueStore, read_typed, write_typed};

/// Store key of the persisted volume.
pub const VOLUME_KEY: &str = "player:volume";

/// Volume used when none was persisted.
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Past this many seconds, `prev` restarts the current track instead of
/// moving back.
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Pending notifications before new ones are dropped.
const EVENT_CAPACITY: usize = 64;

pub struct PlaybackEngine<D: AudioDevice> {
    device: D,
    queue: PlayQueue,
    status: PlaybackStatus,
    current_time: f64,
    duration: f64,
    volume: f32,
    /// Live play generation; see [`PlayTicket`]
    generation: u64,
    /// Whether the device holds the current track's source
    loaded: bool,
    store: Arc<dyn KeyValueStore>,
    rng: StdRng,
    events_tx: Sender<PlayerEvent>,
    events_rx: Receiver<PlayerEvent>,
}

impl<D: AudioDevice> PlaybackEngine<D> {
    /// Create an engine, restoring the persisted volume.
    pub fn new(device: D, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_rng(device, store, StdRng::from_os_rng())
    }

    /// Create an engine with deterministic shuffle.
    pub fn with_seed(device: D, store: Arc<dyn KeyValueStore>, seed: u64) -> Self {
        Self::with_rng(device, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut device: D, store: Arc<dyn KeyValueStore>, rng: StdRng) -> Self {
        let volume = match read_typed::<f32>(store.as_ref(), VOLUME_KEY) {
            Ok(Some(v)) if v.is_finite() => v.clamp(0.0, 1.0),
            Ok(_) => DEFAULT_VOLUME,
            Err(e) => {
                tracing::warn!("Could not read persisted volume: {}", e);
                DEFAULT_VOLUME
            }
        };
        device.set_volume(volume);

        let (events_tx, events_rx) = bounded(EVENT_CAPACITY);
        Self {
            device,
            queue: PlayQueue::new(),
            status: PlaybackStatus::Idle,
            current_time: 0.0,
            duration: 0.0,
            volume,
            generation: 0,
            loaded: false,
            store,
            rng,
            events_tx,
            events_rx,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Receiver for engine notifications.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.events_rx.clone()
    }

    /// Get current transport state snapshot.
    pub fn state(&self) -> TransportState {
        TransportState {
            status: self.status,
            is_playing: self.status.is_playing(),
            current_time_sec: self.current_time,
            duration_sec: self.duration,
            volume: self.volume,
            shuffle: self.queue.shuffle(),
            repeat_mode: self.queue.repeat(),
            current_index: self.queue.current_index(),
            queue_len: self.queue.len(),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Get a reference to the play queue.
    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply a command.
    pub fn dispatch(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::LoadQueue { tracks, start } => self.load_queue(tracks, start),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Toggle => self.toggle(),
            PlayerCommand::Next => self.next(),
            PlayerCommand::Prev => self.prev(),
            PlayerCommand::Seek(secs) => self.seek(secs),
            PlayerCommand::SetVolume(volume) => self.set_volume(volume),
            PlayerCommand::ToggleShuffle => self.toggle_shuffle(),
            PlayerCommand::CycleRepeat => self.cycle_repeat(),
            PlayerCommand::Add(track) => self.add(track),
            PlayerCommand::PlayAt(index) => self.play_at(index),
            PlayerCommand::Remove(index) => {
                self.remove(index);
            }
            PlayerCommand::Clear => self.clear(),
        }
    }

    /// Replace the queue and start playing at `start` (clamped).
    pub fn load_queue(&mut self, tracks: Vec<Track>, start: usize) {
        if self.queue.replace(tracks, start).is_some() {
            self.start_current();
        } else {
            self.reset_transport();
        }
    }

    /// Start or resume playback. No-op while playing or already requested.
    pub fn play(&mut self) {
        match self.status {
            PlaybackStatus::Idle | PlaybackStatus::Playing | PlaybackStatus::Loading => {}
            PlaybackStatus::Ready | PlaybackStatus::Paused => {
                if self.loaded {
                    self.request_play();
                } else {
                    self.start_current();
                }
            }
        }
    }

    /// Pause playback. Any pending play request becomes stale.
    pub fn pause(&mut self) {
        if !matches!(self.status, PlaybackStatus::Playing | PlaybackStatus::Loading) {
            return;
        }
        self.generation += 1;
        self.device.pause();
        self.current_time = self.device.position();
        self.set_status(PlaybackStatus::Paused);
    }

    /// Toggle play/pause.
    pub fn toggle(&mut self) {
        match self.status {
            PlaybackStatus::Playing | PlaybackStatus::Loading => self.pause(),
            _ => self.play(),
        }
    }

    /// Skip to next track in queue.
    pub fn next(&mut self) {
        match self.queue.advance(&mut self.rng) {
            Step::Moved(_) => self.start_current(),
            Step::End => self.stop(),
        }
    }

    /// Skip to previous track (or restart if > 3 seconds in).
    pub fn prev(&mut self) {
        if self.current_time > RESTART_THRESHOLD_SECS {
            self.seek(0.0);
            return;
        }
        match self.queue.retreat(&mut self.rng) {
            Step::Moved(_) => self.start_current(),
            Step::End => self.stop(),
        }
    }

    /// Seek to `secs`, clamped to `[0, duration]` (upper bound only once the
    /// duration is known).
    pub fn seek(&mut self, secs: f64) {
        if self.queue.is_empty() {
            return;
        }
        let mut target = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        if self.duration > 0.0 {
            target = target.min(self.duration);
        }
        self.device.seek(target);
        self.current_time = target;
    }

    /// Set volume (0.0 - 1.0) and persist it.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.device.set_volume(self.volume);
        if let Err(e) = write_typed(self.store.as_ref(), VOLUME_KEY, &self.volume) {
            tracing::warn!("Could not persist volume: {}", e);
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.queue.set_shuffle(!self.queue.shuffle());
    }

    /// Cycle repeat mode: off, one, all.
    pub fn cycle_repeat(&mut self) {
        self.queue.cycle_repeat();
    }

    /// Append to the queue without touching the transport.
    pub fn add(&mut self, track: Track) {
        let was_empty = self.queue.is_empty();
        self.queue.add(track);
        if was_empty {
            self.loaded = false;
            self.emit_track_changed();
            self.set_status(PlaybackStatus::Ready);
        }
    }

    /// Jump to `index` (clamped) and play.
    pub fn play_at(&mut self, index: usize) {
        if self.queue.jump_to(index).is_some() {
            self.start_current();
        }
    }

    /// Remove the track at `index`. Removing the current track stops
    /// playback on its successor, which becomes current.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        let was_current = self.queue.current_index() == Some(index);
        let removed = self.queue.remove(index)?;

        if self.queue.is_empty() {
            self.reset_transport();
        } else if was_current {
            self.generation += 1;
            self.device.pause();
            self.loaded = false;
            self.current_time = 0.0;
            self.duration = 0.0;
            self.emit_track_changed();
            self.set_status(PlaybackStatus::Ready);
        }
        Some(removed)
    }

    /// Empty the queue and stop.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.reset_transport();
    }

    // ------------------------------------------------------------------
    // Device events
    // ------------------------------------------------------------------

    /// Apply a device notification.
    pub fn handle_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::PlayResolved { ticket, result } => {
                if !self.is_live(ticket, "play resolution") {
                    return;
                }
                match result {
                    Ok(()) => self.set_status(PlaybackStatus::Playing),
                    Err(e) => self.fail(e),
                }
            }
            DeviceEvent::Ended { ticket } => {
                // A source replaced by a skip may still report its end
                if !self.is_live(ticket, "end of source") {
                    return;
                }
                if self.queue.repeat() == RepeatMode::One {
                    self.device.seek(0.0);
                    self.current_time = 0.0;
                    self.request_play();
                } else {
                    self.next();
                }
            }
            DeviceEvent::TimeUpdate(secs) => {
                if secs.is_finite() && secs >= 0.0 {
                    self.current_time = secs;
                }
            }
            DeviceEvent::DurationChange(secs) => {
                if secs.is_finite() && secs >= 0.0 {
                    self.duration = secs;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn is_live(&self, ticket: PlayTicket, what: &str) -> bool {
        if ticket.generation == self.generation {
            return true;
        }
        tracing::debug!(
            "Ignoring stale {} (generation {} index {}, live {})",
            what,
            ticket.generation,
            ticket.index,
            self.generation
        );
        false
    }

    /// Load the current track into the device and request playback.
    fn start_current(&mut self) {
        let Some(track) = self.queue.current().cloned() else {
            self.reset_transport();
            return;
        };

        self.generation += 1;
        self.current_time = 0.0;
        self.duration = track.duration_sec.map(f64::from).unwrap_or(0.0);
        self.emit_track_changed();

        let Some(src) = track.audio_url.as_deref() else {
            self.loaded = false;
            self.device.pause();
            self.set_status(PlaybackStatus::Ready);
            self.advise(format!("\"{}\" has no playable audio", track.title));
            return;
        };

        match self.device.load(src) {
            Ok(()) => {
                self.loaded = true;
                self.request_play();
            }
            Err(e) => {
                self.loaded = false;
                self.fail(e);
            }
        }
    }

    fn request_play(&mut self) {
        let Some(index) = self.queue.current_index() else {
            return;
        };
        self.generation += 1;
        self.set_status(PlaybackStatus::Loading);
        self.device.play(PlayTicket {
            generation: self.generation,
            index,
        });
    }

    /// Stop at a queue end; the index and position are held.
    fn stop(&mut self) {
        self.generation += 1;
        self.device.pause();
        let status = if self.queue.is_empty() {
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Ready
        };
        self.set_status(status);
    }

    fn fail(&mut self, error: PlaybackError) {
        let title = self
            .queue
            .current()
            .map(|t| t.title.clone())
            .unwrap_or_default();
        tracing::warn!("Playback failed for \"{}\": {}", title, error);

        self.generation += 1;
        let status = if self.current_time > 0.0 {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Ready
        };
        self.set_status(status);
        self.advise(format!("Couldn't play \"{}\": {}", title, error));
    }

    fn reset_transport(&mut self) {
        self.generation += 1;
        self.device.pause();
        self.loaded = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.emit_track_changed();
        self.set_status(PlaybackStatus::Idle);
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            self.status = status;
            self.emit(PlayerEvent::StatusChanged(status));
        }
    }

    fn emit_track_changed(&self) {
        self.emit(PlayerEvent::TrackChanged {
            index: self.queue.current_index(),
            track: self.queue.current().cloned(),
        });
    }

    fn advise(&self, message: String) {
        self.emit(PlayerEvent::Advisory(message));
    }

    fn emit(&self, event: PlayerEvent) {
        // Slow subscribers lose events rather than stall playback
        if let Err(TrySendError::Full(event)) = self.events_tx.try_send(event) {
            tracing::debug!("Dropping player event, subscribers behind: {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::{MockDevice, inert_track, track};
    use serde_json::json;

    fn engine() -> PlaybackEngine<MockDevice> {
        PlaybackEngine::with_seed(MockDevice::default(), Arc::new(MemoryStore::new()), 42)
    }

    fn tracks(n: usize) -> Vec<Track> {
        (0..n).map(|i| track(&i.to_string())).collect()
    }

    /// Confirm the most recent play request.
    fn confirm(engine: &mut PlaybackEngine<MockDevice>) {
        let ticket = engine.device().last_ticket().expect("a play request");
        engine.handle_event(DeviceEvent::PlayResolved {
            ticket,
            result: Ok(()),
        });
    }

    /// The current source plays to its end.
    fn end(engine: &mut PlaybackEngine<MockDevice>) {
        let ticket = engine.device().last_ticket().expect("a play request");
        engine.handle_event(DeviceEvent::Ended { ticket });
    }

    fn tick(engine: &mut PlaybackEngine<MockDevice>, secs: f64) {
        engine.device_mut().position = secs;
        engine.handle_event(DeviceEvent::TimeUpdate(secs));
    }

    #[test]
    fn test_load_queue_requests_play() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 1);

        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.status(), PlaybackStatus::Loading);
        assert!(!engine.is_playing());
        assert_eq!(engine.device().loads.last().unwrap(), &track("1").audio_url.unwrap());

        confirm(&mut engine);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_play_is_noop_while_playing() {
        let mut engine = engine();
        engine.load_queue(tracks(1), 0);
        confirm(&mut engine);
        let requests = engine.device().tickets.len();

        engine.play();
        assert_eq!(engine.device().tickets.len(), requests);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine();
        engine.load_queue(tracks(2), 0);
        confirm(&mut engine);
        tick(&mut engine, 12.0);

        engine.toggle();
        assert_eq!(engine.status(), PlaybackStatus::Paused);
        assert_eq!(engine.current_time(), 12.0);

        engine.toggle();
        assert_eq!(engine.status(), PlaybackStatus::Loading);
        // Resume does not reload the source
        assert_eq!(engine.device().loads.len(), 1);
        confirm(&mut engine);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_next_to_end_stops_without_moving() {
        for n in 1..6 {
            let mut engine = engine();
            engine.load_queue(tracks(n), 0);
            for expected in 1..n {
                engine.next();
                assert_eq!(engine.current_index(), Some(expected));
            }
            confirm(&mut engine);
            tick(&mut engine, 30.0);

            engine.next();
            assert!(!engine.is_playing());
            assert_eq!(engine.current_index(), Some(n - 1));
            assert_eq!(engine.status(), PlaybackStatus::Ready);
            assert_eq!(engine.current_time(), 30.0);
        }
    }

    #[test]
    fn test_next_wraps_with_repeat_all() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 2);
        engine.cycle_repeat();
        engine.cycle_repeat();
        assert_eq!(engine.queue().repeat(), RepeatMode::All);

        engine.next();
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.status(), PlaybackStatus::Loading);
    }

    #[test]
    fn test_prev_restarts_after_threshold() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 1);
        confirm(&mut engine);
        tick(&mut engine, 3.5);

        engine.prev();
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.current_time(), 0.0);
        assert_eq!(engine.device().seeks.last(), Some(&0.0));
        assert!(engine.is_playing());

        engine.prev();
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn test_prev_at_start_stops_or_wraps() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 0);
        engine.prev();
        assert_eq!(engine.current_index(), Some(0));
        assert!(!engine.is_playing());

        engine.queue.set_repeat(RepeatMode::All);
        engine.prev();
        assert_eq!(engine.current_index(), Some(2));
    }

    #[test]
    fn test_shuffle_next_stays_in_range() {
        let mut engine = engine();
        engine.load_queue(vec![track("a"), track("b")], 0);
        engine.toggle_shuffle();
        for _ in 0..10 {
            engine.next();
            let index = engine.current_index().unwrap();
            assert!(index < 2);
        }
    }

    #[test]
    fn test_stale_resolution_is_ignored() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 0);
        let first = engine.device().last_ticket().unwrap();

        // User skips before the first play resolves
        engine.next();
        engine.handle_event(DeviceEvent::PlayResolved {
            ticket: first,
            result: Ok(()),
        });
        assert_eq!(engine.status(), PlaybackStatus::Loading);
        assert_eq!(engine.current_index(), Some(1));

        // A late failure for the old track is ignored too
        engine.handle_event(DeviceEvent::PlayResolved {
            ticket: first,
            result: Err(PlaybackError::Rejected("late".into())),
        });
        assert_eq!(engine.status(), PlaybackStatus::Loading);

        confirm(&mut engine);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_resolution_after_pause_is_stale() {
        let mut engine = engine();
        engine.load_queue(tracks(1), 0);
        let ticket = engine.device().last_ticket().unwrap();
        engine.pause();

        engine.handle_event(DeviceEvent::PlayResolved {
            ticket,
            result: Ok(()),
        });
        assert_eq!(engine.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_play_failure_reports_advisory() {
        let mut engine = engine();
        let events = engine.subscribe();
        engine.load_queue(tracks(2), 0);

        let ticket = engine.device().last_ticket().unwrap();
        engine.handle_event(DeviceEvent::PlayResolved {
            ticket,
            result: Err(PlaybackError::Unsupported("codec".into())),
        });

        assert!(!engine.is_playing());
        assert_eq!(engine.status(), PlaybackStatus::Ready);
        let advisories: Vec<_> = events
            .try_iter()
            .filter(|e| matches!(e, PlayerEvent::Advisory(_)))
            .collect();
        assert_eq!(advisories.len(), 1);
    }

    #[test]
    fn test_load_failure_is_contained() {
        let mut engine = engine();
        engine.device_mut().fail_loads = true;
        engine.load_queue(tracks(2), 0);
        assert!(!engine.is_playing());
        assert_eq!(engine.status(), PlaybackStatus::Ready);
        assert!(engine.device().tickets.is_empty());
    }

    #[test]
    fn test_inert_track_is_not_played() {
        let mut engine = engine();
        let events = engine.subscribe();
        engine.load_queue(vec![inert_track("x")], 0);

        assert_eq!(engine.status(), PlaybackStatus::Ready);
        assert!(engine.device().loads.is_empty());
        assert!(
            events
                .try_iter()
                .any(|e| matches!(e, PlayerEvent::Advisory(m) if m.contains("Title x")))
        );
    }

    #[test]
    fn test_seek_clamps() {
        let mut engine = engine();
        engine.load_queue(tracks(1), 0);
        engine.handle_event(DeviceEvent::DurationChange(200.0));

        engine.seek(500.0);
        assert_eq!(engine.current_time(), 200.0);
        engine.seek(-4.0);
        assert_eq!(engine.current_time(), 0.0);
        engine.seek(42.5);
        assert_eq!(engine.device().seeks.last(), Some(&42.5));
    }

    #[test]
    fn test_volume_is_clamped_and_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut engine = PlaybackEngine::with_seed(MockDevice::default(), store.clone(), 1);
        assert_eq!(engine.volume(), DEFAULT_VOLUME);

        engine.load_queue(tracks(1), 0);
        let status = engine.status();
        engine.set_volume(1.7);
        assert_eq!(engine.volume(), 1.0);
        assert_eq!(engine.device().volume, 1.0);
        assert_eq!(engine.status(), status);

        engine.set_volume(0.25);
        assert_eq!(store.get(VOLUME_KEY).unwrap(), Some(json!(0.25)));

        // A new session starts at the persisted volume
        let restored = PlaybackEngine::with_seed(MockDevice::default(), store, 1);
        assert_eq!(restored.volume(), 0.25);
        assert_eq!(restored.device().volume, 0.25);
    }

    #[test]
    fn test_modes_have_no_transport_effect() {
        let mut engine = engine();
        engine.load_queue(tracks(2), 0);
        confirm(&mut engine);
        let requests = engine.device().tickets.len();

        engine.toggle_shuffle();
        engine.cycle_repeat();
        assert!(engine.is_playing());
        assert_eq!(engine.device().tickets.len(), requests);
        assert!(engine.state().shuffle);
        assert_eq!(engine.state().repeat_mode, RepeatMode::One);
    }

    #[test]
    fn test_add_keeps_index_and_transport() {
        let mut engine = engine();
        engine.add(track("a"));
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.status(), PlaybackStatus::Ready);

        engine.play();
        confirm(&mut engine);
        engine.add(track("b"));
        assert_eq!(engine.current_index(), Some(0));
        assert!(engine.is_playing());
        assert_eq!(engine.queue().len(), 2);
    }

    #[test]
    fn test_play_at_clamps() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 0);
        engine.play_at(99);
        assert_eq!(engine.current_index(), Some(2));
        assert_eq!(engine.status(), PlaybackStatus::Loading);
    }

    #[test]
    fn test_ended_repeats_one_in_place() {
        let mut engine = engine();
        engine.load_queue(tracks(2), 0);
        engine.cycle_repeat();
        confirm(&mut engine);
        tick(&mut engine, 100.0);

        end(&mut engine);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.current_time(), 0.0);
        assert_eq!(engine.status(), PlaybackStatus::Loading);
        assert_eq!(engine.device().loads.len(), 1);
    }

    #[test]
    fn test_ended_advances() {
        let mut engine = engine();
        engine.load_queue(tracks(2), 0);
        confirm(&mut engine);
        end(&mut engine);
        assert_eq!(engine.current_index(), Some(1));

        confirm(&mut engine);
        end(&mut engine);
        assert_eq!(engine.current_index(), Some(1));
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_late_end_of_skipped_source_is_ignored() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 0);
        confirm(&mut engine);
        let first = engine.device().last_ticket().unwrap();

        engine.next();
        confirm(&mut engine);
        engine.handle_event(DeviceEvent::Ended { ticket: first });
        assert_eq!(engine.current_index(), Some(1));
        assert!(engine.is_playing());

        end(&mut engine);
        assert_eq!(engine.current_index(), Some(2));
    }

    #[test]
    fn test_huge_duration_is_formattable() {
        let mut engine = engine();
        engine.load_queue(tracks(1), 0);
        engine.handle_event(DeviceEvent::DurationChange(1e30));
        assert_eq!(engine.state().duration_str(), "0:00");
    }

    #[test]
    fn test_time_events_do_not_touch_queue() {
        let mut engine = engine();
        engine.load_queue(tracks(2), 1);
        engine.handle_event(DeviceEvent::TimeUpdate(5.0));
        engine.handle_event(DeviceEvent::DurationChange(180.0));
        let state = engine.state();
        assert_eq!(state.current_time_sec, 5.0);
        assert_eq!(state.duration_sec, 180.0);
        assert_eq!(state.current_index, Some(1));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut engine = engine();
        engine.load_queue(tracks(3), 1);
        confirm(&mut engine);

        engine.remove(0);
        assert_eq!(engine.current_index(), Some(0));
        assert!(engine.is_playing());

        engine.remove(0);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.status(), PlaybackStatus::Ready);
        assert_eq!(engine.current_track().unwrap().id, "2");

        engine.clear();
        assert_eq!(engine.current_index(), None);
        assert_eq!(engine.status(), PlaybackStatus::Idle);
        engine.play();
        assert_eq!(engine.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let mut engine = engine();
        engine.dispatch(PlayerCommand::LoadQueue {
            tracks: tracks(2),
            start: 0,
        });
        engine.dispatch(PlayerCommand::Next);
        assert_eq!(engine.current_index(), Some(1));
        engine.dispatch(PlayerCommand::SetVolume(0.3));
        assert_eq!(engine.volume(), 0.3);
        engine.dispatch(PlayerCommand::Clear);
        assert_eq!(engine.queue().len(), 0);
    }

    #[test]
    fn test_events_published() {
        let mut engine = engine();
        let events = engine.subscribe();
        engine.load_queue(tracks(1), 0);
        confirm(&mut engine);

        let received: Vec<_> = events.try_iter().collect();
        assert!(matches!(
            received.first(),
            Some(PlayerEvent::TrackChanged { index: Some(0), .. })
        ));
        assert!(received.contains(&PlayerEvent::StatusChanged(PlaybackStatus::Playing)));
    }
}
