/// Track domain type
use crate::types::{Card, CardKey};
use serde::{Deserialize, Serialize};

/// A playable media item and the cards that subdivide it.
///
/// Owned by the host's data source and treated as read-only by the
/// playback layer; changing the selection swaps the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Media URI, if the track has audio at all
    pub audio: Option<String>,

    /// Cards in display order
    pub cards: Vec<Card>,
}

impl Track {
    /// Create a track with no audio and no cards.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            audio: None,
            cards: Vec::new(),
        }
    }

    /// Whether the track has audio to play.
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Find the position of the card matching `key`, if any.
    ///
    /// Used by hosts to restore a card selection from persisted identity.
    pub fn find_card(&self, key: &CardKey) -> Option<usize> {
        self.cards
            .iter()
            .enumerate()
            .find(|(index, card)| card.identity_at(*index) == *key)
            .map(|(index, _)| index)
    }
}
