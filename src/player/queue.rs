//! Play queue management.
//!
//! The queue owns the ordered tracks, the current index and the shuffle and
//! repeat modes. Whenever it holds tracks the current index is in bounds;
//! every mutation clamps rather than letting it drift out of range.

use rand::Rng;

use super::state::RepeatMode;
use crate::model::Track;

/// Outcome of moving through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The current index is now this one
    Moved(usize),
    /// Ran off an end with nothing to wrap to; the index is unchanged
    End,
}

/// The play queue with current position tracking.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    /// All tracks, insertion order, duplicates allowed
    items: Vec<Track>,
    /// Current position; `None` only when empty
    position: Option<usize>,
    /// Shuffle mode enabled
    shuffle: bool,
    /// Repeat mode
    repeat: RepeatMode,
}

impl PlayQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get queue length.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Replace the whole queue, starting at `start` (clamped).
    pub fn replace(&mut self, tracks: Vec<Track>, start: usize) -> Option<usize> {
        self.items = tracks;
        self.position = self.clamp(start);
        self.position
    }

    /// Add a track to the end of the queue. The current index only moves
    /// when the queue was empty.
    pub fn add(&mut self, track: Track) {
        self.items.push(track);
        if self.position.is_none() {
            self.position = Some(0);
        }
    }

    /// Clear the queue.
    pub fn clear(&mut self) {
        self.items.clear();
        self.position = None;
    }

    /// Remove the track at `index`.
    ///
    /// Removing a track before the current one shifts the index down so the
    /// same track stays current; removing the current track makes its
    /// successor (or the new last track) current.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.items.len() {
            return None;
        }
        let track = self.items.remove(index);

        self.position = match self.position {
            _ if self.items.is_empty() => None,
            Some(pos) if index < pos => Some(pos - 1),
            Some(pos) => self.clamp(pos),
            None => Some(0),
        };
        Some(track)
    }

    /// Get all tracks in the queue.
    pub fn items(&self) -> &[Track] {
        &self.items
    }

    /// Get current position.
    pub fn current_index(&self) -> Option<usize> {
        self.position
    }

    /// Get current track.
    pub fn current(&self) -> Option<&Track> {
        self.position.and_then(|i| self.items.get(i))
    }

    /// Jump to `index`, clamped into bounds.
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        self.position = self.clamp(index);
        self.position
    }

    /// Move forward: a random index under shuffle (the current one
    /// included), else the next index, wrapping only under repeat-all.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Step {
        let Some(pos) = self.position else {
            return Step::End;
        };
        let len = self.items.len();

        let next = if self.shuffle {
            Some(rng.random_range(0..len))
        } else if pos + 1 < len {
            Some(pos + 1)
        } else if self.repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        };
        self.step_to(next)
    }

    /// Move backward, mirroring [`advance`](Self::advance).
    pub fn retreat<R: Rng>(&mut self, rng: &mut R) -> Step {
        let Some(pos) = self.position else {
            return Step::End;
        };
        let len = self.items.len();

        let prev = if self.shuffle {
            Some(rng.random_range(0..len))
        } else if pos > 0 {
            Some(pos - 1)
        } else if self.repeat == RepeatMode::All {
            Some(len - 1)
        } else {
            None
        };
        self.step_to(prev)
    }

    fn step_to(&mut self, index: Option<usize>) -> Step {
        match index {
            Some(i) => {
                self.position = Some(i);
                Step::Moved(i)
            }
            None => Step::End,
        }
    }

    fn clamp(&self, index: usize) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        }
    }

    /// Set shuffle mode.
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
    }

    /// Get shuffle mode.
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Cycle repeat mode.
    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
    }

    /// Set repeat mode.
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Get repeat mode.
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }
}
