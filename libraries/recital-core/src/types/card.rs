/// Card domain type and identity derivation
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A displayable study unit referencing an optional sub-range of its
/// track's audio.
///
/// Timing fields are authored in seconds. An `audio_end` that does not lie
/// strictly past `audio_start` is treated as absent by the playback layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Explicit identifier, if the data source assigns one
    pub id: Option<String>,

    /// Position in the recitation (1-based, as authored)
    pub sequence: Option<u32>,

    /// Recitation text
    pub text: Option<String>,

    /// Start of the card's audio range, in seconds
    pub audio_start: Option<f64>,

    /// End of the card's audio range, in seconds
    pub audio_end: Option<f64>,
}

impl Card {
    /// Start of the card's audio range, filtered to values a position can
    /// actually take (finite, non-negative, in range).
    pub fn start_position(&self) -> Option<Duration> {
        self.audio_start
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// End of the card's audio range, filtered like the start. Ordering
    /// against the start is checked where a segment is built, not here.
    pub fn end_position(&self) -> Option<Duration> {
        self.audio_end
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// Whether the card can be segment-played at all.
    ///
    /// A card without a usable `audio_start` has no segment affordance;
    /// hosts disable the control rather than surface an error.
    pub fn can_segment_play(&self) -> bool {
        self.start_position().is_some()
    }

    /// Derive the card's identity.
    ///
    /// Preference order: explicit id, sequence number, positional index,
    /// recitation text. Returns `None` only when every source is absent;
    /// with an index supplied the derivation is total.
    pub fn identity(&self, index: Option<usize>) -> Option<CardKey> {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            return Some(CardKey(id.to_string()));
        }

        if let Some(sequence) = self.sequence {
            return Some(CardKey(format!("sequence:{sequence}")));
        }

        if let Some(index) = index {
            return Some(CardKey(format!("index:{index}")));
        }

        self.text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(|text| CardKey(format!("text:{text}")))
    }

    /// Derive the card's identity at a known position in its track.
    pub fn identity_at(&self, index: usize) -> CardKey {
        self.identity(Some(index))
            .unwrap_or_else(|| CardKey(format!("index:{index}")))
    }
}

/// Stable card identity.
///
/// Equal keys mean "the same card" across re-renders and selection
/// round-trips, so segment/card matching stays reliable even when the host
/// rebuilds its card list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey(String);

impl CardKey {
    /// View the key as a string (e.g. for URL parameters).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardKey {
    fn from(value: &str) -> Self {
        CardKey(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card {
            id: None,
            sequence: None,
            text: None,
            audio_start: None,
            audio_end: None,
        }
    }

    #[test]
    fn identity_prefers_explicit_id() {
        let card = Card {
            id: Some("card-7".to_string()),
            sequence: Some(3),
            text: Some("namu".to_string()),
            ..card()
        };

        assert_eq!(card.identity(Some(0)), Some(CardKey::from("card-7")));
    }

    #[test]
    fn identity_falls_back_to_sequence_then_index_then_text() {
        let mut card = Card {
            sequence: Some(3),
            text: Some("namu".to_string()),
            ..card()
        };
        assert_eq!(card.identity(Some(5)), Some(CardKey::from("sequence:3")));

        card.sequence = None;
        assert_eq!(card.identity(Some(5)), Some(CardKey::from("index:5")));
        assert_eq!(card.identity(None), Some(CardKey::from("text:namu")));

        card.text = None;
        assert_eq!(card.identity(None), None);
    }

    #[test]
    fn identity_ignores_empty_id() {
        let card = Card {
            id: Some(String::new()),
            sequence: Some(2),
            ..card()
        };

        assert_eq!(card.identity(None), Some(CardKey::from("sequence:2")));
    }

    #[test]
    fn identity_is_stable_across_calls() {
        let card = Card {
            sequence: Some(9),
            ..card()
        };

        assert_eq!(card.identity_at(0), card.identity_at(4));
    }

    #[test]
    fn start_position_filters_invalid_values() {
        let mut card = Card {
            audio_start: Some(12.5),
            ..card()
        };
        assert_eq!(card.start_position(), Some(Duration::from_secs_f64(12.5)));
        assert!(card.can_segment_play());

        card.audio_start = Some(-1.0);
        assert_eq!(card.start_position(), None);

        card.audio_start = Some(f64::NAN);
        assert_eq!(card.start_position(), None);
        assert!(!card.can_segment_play());
    }

    #[test]
    fn deserializes_from_host_data() {
        let card: Card = serde_json::from_str(
            r#"{"id":null,"sequence":1,"text":"gyo","audio_start":0.5,"audio_end":4.25}"#,
        )
        .unwrap();

        assert_eq!(card.sequence, Some(1));
        assert_eq!(card.end_position(), Some(Duration::from_secs_f64(4.25)));
    }
}
