//! Recital Core
//!
//! Platform-agnostic domain types for Recital.
//!
//! This crate provides the read-only study data that the host application
//! loads and hands to the playback layer:
//! - **Domain Types**: [`Track`], [`Card`]
//! - **Card Identity**: [`CardKey`] derivation, stable across re-renders
//!
//! The data is owned by the host's data source. The playback layer never
//! mutates it; a selection change swaps the whole [`Track`].
//!
//! # Example
//!
//! ```rust
//! use recital_core::{Card, Track};
//!
//! let track = Track {
//!     id: "heart-sutra".to_string(),
//!     audio: Some("https://example.org/audio/heart-sutra.mp3".to_string()),
//!     cards: vec![Card {
//!         id: None,
//!         sequence: Some(1),
//!         text: Some("kan ji zai bo satsu".to_string()),
//!         audio_start: Some(12.0),
//!         audio_end: Some(18.0),
//!     }],
//! };
//!
//! assert!(track.has_audio());
//! assert!(track.cards[0].can_segment_play());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

pub use types::{Card, CardKey, Track};
