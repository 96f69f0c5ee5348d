//! Core types for playback control

use recital_core::{Card, CardKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback regime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Nothing in flight
    #[default]
    Idle,

    /// Playing the track end-to-end
    Full,

    /// Playing the bounded range of the active card
    Segment,
}

/// The active bounded play range, tied to one card.
///
/// At most one segment exists at a time. It is created by a segment-play
/// request and destroyed on stop, on reaching its boundary, on track
/// change, or when a scrub leaves its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Identity of the card the range belongs to
    pub card: CardKey,

    /// Range start
    pub start: Duration,

    /// Range end; `None` plays through to the end of the track
    pub end: Option<Duration>,
}

impl Segment {
    /// Build a segment from a card's authored bounds.
    ///
    /// The end survives only when the card has a start and the end lies
    /// strictly past it; everything else is validated away here so the
    /// rest of the controller never re-checks ordering.
    pub fn from_card(card: &Card, key: CardKey) -> Self {
        let start = card.start_position();
        let end = card
            .end_position()
            .filter(|end| start.is_some_and(|start| *end > start));

        Self {
            card: key,
            start: start.unwrap_or(Duration::ZERO),
            end,
        }
    }

    /// Whether `position` lies inside `[start, end]` (upper bound open
    /// when the segment has no end).
    pub fn contains(&self, position: Duration) -> bool {
        position >= self.start && self.end.map_or(true, |end| position <= end)
    }
}

/// Snapshot of the controller's observable state.
///
/// `active_card` is populated only in [`PlaybackMode::Segment`];
/// `progress` never exceeds `duration` once the duration is known.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Current playback regime
    pub mode: PlaybackMode,

    /// Whether the resource is audibly playing
    pub is_playing: bool,

    /// Card owning the active segment, if any
    pub active_card: Option<CardKey>,

    /// Last reported playback position
    pub progress: Duration,

    /// Track duration; zero until metadata arrives
    pub duration: Duration,

    /// Whether a user drag is in flight
    pub is_scrubbing: bool,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// How close a settled position must be to the requested start
    /// (default: 50 ms)
    pub seek_tolerance: Duration,

    /// Re-seek budget for the settle watcher (default: 8)
    pub max_seek_attempts: u8,

    /// How long to wait for the resource's seek-completed signal before
    /// starting playback anyway (default: 150 ms)
    pub seek_completion_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            seek_tolerance: Duration::from_millis(50),
            max_seek_attempts: 8,
            seek_completion_timeout: Duration::from_millis(150),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(start: Option<f64>, end: Option<f64>) -> Card {
        Card {
            id: None,
            sequence: Some(1),
            text: None,
            audio_start: start,
            audio_end: end,
        }
    }

    #[test]
    fn default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.seek_tolerance, Duration::from_millis(50));
        assert_eq!(config.max_seek_attempts, 8);
        assert_eq!(config.seek_completion_timeout, Duration::from_millis(150));
    }

    #[test]
    fn segment_keeps_valid_end() {
        let card = card(Some(12.0), Some(18.0));
        let segment = Segment::from_card(&card, card.identity_at(0));

        assert_eq!(segment.start, Duration::from_secs(12));
        assert_eq!(segment.end, Some(Duration::from_secs(18)));
    }

    #[test]
    fn segment_drops_end_at_or_before_start() {
        let equal = card(Some(12.0), Some(12.0));
        let segment = Segment::from_card(&equal, equal.identity_at(0));
        assert_eq!(segment.end, None);

        let reversed = card(Some(12.0), Some(4.0));
        let segment = Segment::from_card(&reversed, reversed.identity_at(0));
        assert_eq!(segment.end, None);
    }

    #[test]
    fn segment_drops_end_without_start() {
        let card = card(None, Some(18.0));
        let segment = Segment::from_card(&card, card.identity_at(0));

        assert_eq!(segment.start, Duration::ZERO);
        assert_eq!(segment.end, None);
    }

    #[test]
    fn contains_respects_bounds() {
        let card = card(Some(2.0), Some(10.0));
        let segment = Segment::from_card(&card, card.identity_at(0));

        assert!(segment.contains(Duration::from_secs(2)));
        assert!(segment.contains(Duration::from_secs(10)));
        assert!(!segment.contains(Duration::from_secs_f64(1.9)));
        assert!(!segment.contains(Duration::from_secs_f64(10.1)));
    }

    #[test]
    fn endless_segment_contains_everything_past_start() {
        let card = card(Some(2.0), None);
        let segment = Segment::from_card(&card, card.identity_at(0));

        assert!(segment.contains(Duration::from_secs(3600)));
        assert!(!segment.contains(Duration::from_secs(1)));
    }
}
