//! Playback events
//!
//! Event-based communication for UI synchronization. The controller queues
//! events as state changes happen; the host drains the queue on its own
//! cadence (each frame, or after each command) and re-renders from the
//! snapshot plus whatever the events announce.

use crate::types::PlaybackMode;
use recital_core::CardKey;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Mode or playing flag changed
    StateChanged {
        /// The new playback mode
        mode: PlaybackMode,
        /// Whether the resource is now playing
        is_playing: bool,
    },

    /// A different track was bound (or the track was unbound)
    TrackChanged {
        /// ID of the new track, if any
        track_id: Option<String>,
        /// ID of the previous track, if any
        previous_track_id: Option<String>,
    },

    /// Segment playback reached its boundary and stopped
    SegmentFinished {
        /// Card the finished segment belonged to
        card: CardKey,
    },

    /// Playback ran off the end of the track
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Position update (emitted on demand, not per position event)
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// A non-fatal playback failure (e.g. a rejected play request)
    Error {
        /// Human-readable description
        message: String,
    },
}
