//! Recital - Segment Playback Control
//!
//! Platform-agnostic playback control for flashcard-style audio study.
//!
//! This crate provides:
//! - Two playback regimes: full-track and card-bound segment playback
//! - Precise boundary stopping at a segment's end
//! - Bounded seek settling for transports with imprecise seeks
//! - Scrubbing that demotes segment playback when the drag leaves the
//!   segment's bounds
//! - Pause/resume, restart, stop, and full reset on track change
//!
//! # Architecture
//!
//! `recital-playback` is completely platform-agnostic: it knows nothing
//! about HTML audio elements, native players, or UI frameworks. The host
//! supplies its transport behind the [`MediaResource`] trait, forwards
//! transport events as [`ResourceEvent`]s, and renders from the
//! [`PlaybackState`] snapshot plus the drainable [`PlaybackEvent`] queue.
//!
//! All calls happen on the host's event-loop thread. The only asynchrony
//! is the transport's play request, modelled as a ticketed result
//! ([`PlayStart`]) so one code path covers synchronous and promise-like
//! hosts alike.
//!
//! # Example
//!
//! ```rust
//! use recital_core::{Card, Track};
//! use recital_playback::{
//!     MediaResource, PlayStart, PlaybackController, PlaybackMode, ResourceEvent, Result,
//! };
//! use std::time::Duration;
//!
//! // A toy transport whose seeks land exactly where requested.
//! struct SilentResource {
//!     position: Duration,
//!     playing: bool,
//! }
//!
//! impl MediaResource for SilentResource {
//!     fn play(&mut self) -> PlayStart {
//!         self.playing = true;
//!         PlayStart::Started
//!     }
//!
//!     fn pause(&mut self) {
//!         self.playing = false;
//!     }
//!
//!     fn position(&self) -> Duration {
//!         self.position
//!     }
//!
//!     fn seek(&mut self, position: Duration) -> Result<()> {
//!         self.position = position;
//!         Ok(())
//!     }
//!
//!     fn duration(&self) -> Option<Duration> {
//!         Some(Duration::from_secs(60))
//!     }
//!
//!     fn has_metadata(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # fn main() -> recital_playback::Result<()> {
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
//! let mut controller = PlaybackController::new(SilentResource {
//!     position: Duration::ZERO,
//!     playing: false,
//! });
//!
//! controller.set_track(Some(&track));
//! controller.handle_event(ResourceEvent::MetadataLoaded);
//!
//! // Play the first card's 12s..18s range
//! controller.play_segment(&track.cards[0], 0)?;
//! assert_eq!(controller.mode(), PlaybackMode::Segment);
//! assert!(controller.is_playing());
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod events;
mod limiter;
mod resource;
mod scrub;
mod settler;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use resource::{MediaResource, PlayStart, PlayTicket, ResourceEvent};
pub use types::{ControllerConfig, PlaybackMode, PlaybackState, Segment};
