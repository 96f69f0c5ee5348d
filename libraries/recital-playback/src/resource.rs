//! Platform-agnostic media resource trait
//!
//! Abstracts the host's audio transport (an HTML audio element, a native
//! player handle, ...) behind play/pause/seek/position primitives. Seeks
//! are best-effort: the resource may clamp, round, or land late, which is
//! exactly what the controller's settle logic exists to absorb.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The media transport capability the host provides.
///
/// All calls are issued from the host's event-loop thread; implementors
/// never need internal synchronization. The one asynchronous operation is
/// [`play`](MediaResource::play), whose pending form resolves through
/// [`ResourceEvent::PlayResolved`].
pub trait MediaResource {
    /// Begin playback.
    ///
    /// Hosts whose transport starts synchronously return
    /// [`PlayStart::Started`]. Hosts with promise-like semantics return
    /// [`PlayStart::Pending`] with a fresh ticket and later deliver
    /// [`ResourceEvent::PlayResolved`] carrying the same ticket.
    fn play(&mut self) -> PlayStart;

    /// Halt playback without touching the position.
    fn pause(&mut self);

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Request a reposition. Best-effort: the resulting position may
    /// differ until a later position update or seek-completed event.
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Total duration, once known.
    fn duration(&self) -> Option<Duration>;

    /// Whether metadata (and thus a trustworthy position) is available.
    fn has_metadata(&self) -> bool;
}

/// Outcome of issuing [`MediaResource::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStart {
    /// The transport started synchronously.
    Started,

    /// The transport will report success or rejection later, tagged with
    /// this ticket.
    Pending(PlayTicket),
}

/// Identity of one in-flight play request.
///
/// Tickets let the controller discard resolutions that belong to a play
/// request it has since cancelled or superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayTicket(u64);

impl PlayTicket {
    /// Wrap a raw ticket value. Resources mint these monotonically.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Events the host forwards from the media resource to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceEvent {
    /// Metadata (duration, initial position) became available
    MetadataLoaded,

    /// The resource reported a new position (its native cadence)
    PositionUpdate,

    /// A previously requested seek finished landing
    SeekCompleted,

    /// Playback ran off the end of the track
    Ended,

    /// A pending play request resolved
    PlayResolved {
        /// Ticket returned by the originating [`MediaResource::play`]
        ticket: PlayTicket,
        /// Rejection reason; `None` means playback started
        error: Option<String>,
    },
}

/// Scripted resource for unit tests.
///
/// Seeks land exactly where requested and are logged; play can be
/// configured to resolve synchronously or through tickets.
#[cfg(test)]
pub(crate) struct StubResource {
    pub position: Duration,
    pub duration: Option<Duration>,
    pub metadata: bool,
    pub playing: bool,
    pub async_play: bool,
    pub fail_seeks: bool,
    pub seeks: Vec<Duration>,
    pub tickets_minted: u64,
}

#[cfg(test)]
impl StubResource {
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            position: Duration::ZERO,
            duration: Some(duration),
            metadata: true,
            playing: false,
            async_play: false,
            fail_seeks: false,
            seeks: Vec::new(),
            tickets_minted: 0,
        }
    }

    pub fn last_ticket(&self) -> PlayTicket {
        PlayTicket::new(self.tickets_minted - 1)
    }
}

#[cfg(test)]
impl MediaResource for StubResource {
    fn play(&mut self) -> PlayStart {
        if self.async_play {
            let ticket = PlayTicket::new(self.tickets_minted);
            self.tickets_minted += 1;
            PlayStart::Pending(ticket)
        } else {
            self.playing = true;
            PlayStart::Started
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.fail_seeks {
            return Err(crate::error::PlaybackError::Seek("refused".to_string()));
        }
        self.seeks.push(position);
        self.position = position;
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn has_metadata(&self) -> bool {
        self.metadata
    }
}
