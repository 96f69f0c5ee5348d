//! Playback controller - core orchestration
//!
//! Coordinates mode/state, the boundary limiter, seek settling, and scrub
//! handling over one owned media resource.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    limiter::BoundaryLimiter,
    resource::{MediaResource, PlayStart, PlayTicket, ResourceEvent},
    scrub::plan_scrub,
    settler::{self, SeekSettler, SeekWait, SettleVerdict},
    types::{ControllerConfig, PlaybackMode, PlaybackState, Segment},
};
use recital_core::{Card, CardKey, Track};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One in-flight asynchronous play request.
///
/// The intent decides how much state to roll back if the transport
/// rejects: a failed resume only clears the playing flag, a failed
/// full-track start drops the mode, and a failed segment start tears the
/// whole segment down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayIntent {
    Full,
    Segment,
    Resume,
}

#[derive(Debug, Clone, Copy)]
struct PendingPlay {
    ticket: PlayTicket,
    intent: PlayIntent,
}

/// Segment-aware playback controller.
///
/// Owns the host's media resource and is the single writer of playback
/// state. The host issues commands (play, pause, scrub, ...), forwards
/// resource events through [`handle_event`](Self::handle_event), and calls
/// [`tick`](Self::tick) from its event loop so bounded waits can expire.
/// Everything runs on that one thread; there is no internal locking.
pub struct PlaybackController<R: MediaResource> {
    resource: R,
    config: ControllerConfig,

    // Mode/state store
    mode: PlaybackMode,
    is_playing: bool,
    segment: Option<Segment>,
    progress: Duration,
    duration: Duration,
    is_scrubbing: bool,

    // Bound track
    track_id: Option<String>,
    has_media: bool,

    // Armed watchers. Always disarmed/detached before re-arming; a
    // leaked watcher from a previous operation is the main hazard here.
    limiter: BoundaryLimiter,
    settler: Option<SeekSettler>,
    seek_wait: Option<SeekWait>,

    // In-flight play request (stale resolutions are matched by ticket)
    pending_play: Option<PendingPlay>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<R: MediaResource> PlaybackController<R> {
    /// Create a controller owning `resource`, with default configuration.
    pub fn new(resource: R) -> Self {
        Self::with_config(resource, ControllerConfig::default())
    }

    /// Create a controller owning `resource`.
    pub fn with_config(resource: R, config: ControllerConfig) -> Self {
        Self {
            resource,
            config,
            mode: PlaybackMode::Idle,
            is_playing: false,
            segment: None,
            progress: Duration::ZERO,
            duration: Duration::ZERO,
            is_scrubbing: false,
            track_id: None,
            has_media: false,
            limiter: BoundaryLimiter::default(),
            settler: None,
            seek_wait: None,
            pending_play: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Play the bound track end-to-end from the beginning.
    ///
    /// Clears any active segment. Valid from any state; while already
    /// playing it restarts from zero.
    pub fn play_full(&mut self) -> Result<()> {
        if !self.has_media {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let before = self.observable_state();
        self.cancel_in_flight();
        self.segment = None;
        self.mode = PlaybackMode::Full;
        self.best_effort_seek(Duration::ZERO);
        self.set_progress(Duration::ZERO);
        self.request_play(PlayIntent::Full);
        self.emit_if_changed(before);
        Ok(())
    }

    /// Play the audio range of `card`, which sits at `index` in the bound
    /// track's card list.
    ///
    /// Builds the segment from the card's bounds, arms the boundary
    /// limiter when the card has a usable end, and drives the resource to
    /// the start position before commencing (see [`crate::settler`]). A
    /// card without a start plays immediately from wherever the resource
    /// currently is.
    pub fn play_segment(&mut self, card: &Card, index: usize) -> Result<()> {
        if !self.has_media {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let before = self.observable_state();
        self.cancel_in_flight();
        self.resource.pause();
        self.is_playing = false;

        let segment = Segment::from_card(card, card.identity_at(index));
        if let Some(end) = segment.end {
            self.limiter.arm(end);
        }
        self.segment = Some(segment);
        self.mode = PlaybackMode::Segment;

        match card.start_position() {
            None => self.commence_segment_playback(None),
            Some(start) => match self.resource.seek(start) {
                Err(err) => {
                    // A refused seek must not block starting; play from
                    // wherever the resource is.
                    warn!(%err, "segment start seek refused");
                    self.commence_segment_playback(Some(start));
                }
                Ok(()) => {
                    let landed = settler::delta(self.resource.position(), start)
                        <= self.config.seek_tolerance;
                    if self.resource.has_metadata() && landed {
                        self.commence_segment_playback(Some(start));
                    } else {
                        self.seek_wait = Some(SeekWait::new(
                            start,
                            Instant::now(),
                            self.config.seek_completion_timeout,
                        ));
                    }
                }
            },
        }

        self.emit_if_changed(before);
        Ok(())
    }

    /// Pause playback, retaining mode and segment.
    pub fn pause(&mut self) {
        // A resolution arriving after an explicit pause must not flip the
        // playing flag back on.
        self.pending_play = None;
        self.resource.pause();

        if self.is_playing {
            self.is_playing = false;
            self.emit_state_changed();
        }
    }

    /// Resume playback from the current position.
    ///
    /// Touches nothing but the playing flag: mode and segment stay as
    /// they were, including plain Idle after a stop or scrub.
    pub fn resume(&mut self) -> Result<()> {
        if !self.has_media {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if self.is_playing {
            return Ok(());
        }

        let before = self.observable_state();
        self.request_play(PlayIntent::Resume);
        self.emit_if_changed(before);
        Ok(())
    }

    /// Restart the active segment from its start.
    pub fn restart_segment(&mut self) -> Result<()> {
        let segment = self.segment.clone().ok_or(PlaybackError::NoActiveSegment)?;

        let before = self.observable_state();
        self.pending_play = None;
        self.settler = None;
        self.seek_wait = None;
        self.limiter.disarm();
        if let Some(end) = segment.end {
            self.limiter.arm(end);
        }

        self.best_effort_seek(segment.start);
        self.set_progress(self.resource.position());
        self.mode = PlaybackMode::Segment;
        self.request_play(PlayIntent::Segment);
        self.emit_if_changed(before);
        Ok(())
    }

    /// Stop playback and return to Idle.
    ///
    /// In segment mode the resource is parked at the segment start,
    /// otherwise at zero. Calling `stop` when already idle is a no-op,
    /// which makes it idempotent.
    pub fn stop(&mut self) {
        if self.mode == PlaybackMode::Idle && !self.is_playing && self.pending_play.is_none() {
            return;
        }

        let before = self.observable_state();
        self.cancel_in_flight();
        self.resource.pause();

        let park_at = match (&self.mode, &self.segment) {
            (PlaybackMode::Segment, Some(segment)) => segment.start,
            _ => Duration::ZERO,
        };
        self.best_effort_seek(park_at);

        self.segment = None;
        self.mode = PlaybackMode::Idle;
        self.is_playing = false;
        self.set_progress(self.resource.position());
        self.emit_if_changed(before);
    }

    // ===== Scrubbing =====

    /// Begin a user drag. Automatic progress updates are suppressed until
    /// [`scrub_end`](Self::scrub_end).
    pub fn scrub_start(&mut self) {
        self.is_scrubbing = true;
    }

    /// Apply a drag position.
    ///
    /// The value is clamped to the known duration, the resource is seeked
    /// there, and progress updates immediately. Scrubbing outside the
    /// active segment's bounds clears the segment, disarms the limiter,
    /// and demotes segment playback to unrestricted full-track playback;
    /// the old segment is never silently re-entered.
    pub fn scrub_to(&mut self, position: Duration) {
        // The drag is authoritative; a live settle watcher would yank the
        // position straight back to the segment start.
        self.settler = None;

        let duration = if self.duration > Duration::ZERO {
            self.duration
        } else {
            self.resource.duration().unwrap_or(Duration::ZERO)
        };
        let plan = plan_scrub(position, duration, self.segment.as_ref());

        self.best_effort_seek(plan.position);
        self.set_progress(plan.position);

        if plan.exits_segment {
            let before = self.observable_state();
            self.segment = None;
            self.limiter.disarm();
            if self.mode == PlaybackMode::Segment {
                self.mode = PlaybackMode::Full;
            }
            self.emit_if_changed(before);
        }
    }

    /// End a user drag, re-applying the release value.
    pub fn scrub_end(&mut self, position: Duration) {
        self.scrub_to(position);
        self.is_scrubbing = false;
    }

    // ===== Track Binding =====

    /// Bind a different track (or none), fully resetting playback.
    ///
    /// The resource is paused and rewound first; every watcher, the
    /// segment, progress, and duration are cleared regardless of what was
    /// happening. The host remains responsible for pointing the resource
    /// at the new track's media.
    pub fn set_track(&mut self, track: Option<&Track>) {
        let previous_track_id = self.track_id.take();
        let before = self.observable_state();

        self.cancel_in_flight();
        self.resource.pause();
        self.best_effort_seek(Duration::ZERO);

        self.segment = None;
        self.mode = PlaybackMode::Idle;
        self.is_playing = false;
        self.progress = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.is_scrubbing = false;

        self.track_id = track.map(|t| t.id.clone());
        self.has_media = track.is_some_and(Track::has_audio);

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: self.track_id.clone(),
            previous_track_id,
        });
        self.emit_if_changed(before);
    }

    // ===== Resource Events =====

    /// Feed one resource event through the state machine.
    pub fn handle_event(&mut self, event: ResourceEvent) {
        match event {
            ResourceEvent::MetadataLoaded => self.on_metadata_loaded(),
            ResourceEvent::PositionUpdate => self.on_position_update(),
            ResourceEvent::SeekCompleted => self.on_seek_completed(),
            ResourceEvent::Ended => self.on_ended(),
            ResourceEvent::PlayResolved { ticket, error } => self.on_play_resolved(ticket, error),
        }
    }

    /// Drive time-based fallbacks.
    ///
    /// Hosts call this from their event loop (any cadence comparable to
    /// the resource's position updates is fine). Currently it only expires
    /// the bounded wait for a seek-completed signal.
    pub fn tick(&mut self) {
        self.poll_seek_wait(Instant::now());
    }

    fn on_metadata_loaded(&mut self) {
        self.duration = self.resource.duration().unwrap_or(Duration::ZERO);
        self.set_progress(self.resource.position());
    }

    fn on_position_update(&mut self) {
        self.poll_seek_wait(Instant::now());

        let position = self.resource.position();

        // An armed boundary outranks everything else on this path.
        if self.limiter.triggered(position) {
            self.finish_segment_at_boundary();
            return;
        }

        if let Some(settler) = self.settler.as_mut() {
            match settler.observe(position) {
                SettleVerdict::Settled | SettleVerdict::GaveUp => {
                    self.settler = None;
                }
                SettleVerdict::Retry => {
                    let target = settler.target();
                    debug!(
                        target_secs = target.as_secs_f64(),
                        position_secs = position.as_secs_f64(),
                        "re-seeking toward segment start"
                    );
                    if let Err(err) = self.resource.seek(target) {
                        warn!(%err, "settle re-seek refused; detaching");
                        self.settler = None;
                    }
                }
            }
        }

        if !self.is_scrubbing {
            self.set_progress(position);
        }
    }

    fn on_seek_completed(&mut self) {
        if let Some(wait) = self.seek_wait.take() {
            let before = self.observable_state();
            self.commence_segment_playback(Some(wait.target()));
            self.emit_if_changed(before);
            return;
        }

        // Late seek confirmations double as position reports.
        self.on_position_update();
    }

    fn on_ended(&mut self) {
        let before = self.observable_state();
        self.cancel_in_flight();
        self.resource.pause();

        self.segment = None;
        self.mode = PlaybackMode::Idle;
        self.is_playing = false;
        self.best_effort_seek(Duration::ZERO);
        self.set_progress(Duration::ZERO);

        if let Some(track_id) = self.track_id.clone() {
            self.pending_events
                .push(PlaybackEvent::TrackFinished { track_id });
        }
        self.emit_if_changed(before);
    }

    fn on_play_resolved(&mut self, ticket: PlayTicket, error: Option<String>) {
        let pending = match self.pending_play {
            Some(pending) if pending.ticket == ticket => pending,
            _ => {
                // Belongs to a request that was cancelled or superseded.
                debug!(?ticket, "discarding stale play resolution");
                return;
            }
        };
        self.pending_play = None;

        let before = self.observable_state();
        match error {
            None => {
                self.is_playing = true;
            }
            Some(message) => {
                self.is_playing = false;
                match pending.intent {
                    PlayIntent::Resume => {}
                    PlayIntent::Full => {
                        self.mode = PlaybackMode::Idle;
                    }
                    PlayIntent::Segment => {
                        self.segment = None;
                        self.limiter.disarm();
                        self.settler = None;
                        self.seek_wait = None;
                        self.mode = PlaybackMode::Idle;
                    }
                }
                self.pending_events.push(PlaybackEvent::Error {
                    message: format!("playback could not start: {message}"),
                });
            }
        }
        self.emit_if_changed(before);
    }

    // ===== State Queries =====

    /// Snapshot of the observable playback state.
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            mode: self.mode,
            is_playing: self.is_playing,
            active_card: self.active_card(),
            progress: self.progress,
            duration: self.duration,
            is_scrubbing: self.is_scrubbing,
        }
    }

    /// Current playback mode.
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Whether the resource is audibly playing.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Identity of the card owning the active segment.
    pub fn active_card(&self) -> Option<CardKey> {
        if self.mode == PlaybackMode::Segment {
            self.segment.as_ref().map(|s| s.card.clone())
        } else {
            None
        }
    }

    /// The active segment, if any.
    pub fn segment(&self) -> Option<&Segment> {
        self.segment.as_ref()
    }

    /// Last reported playback position.
    pub fn progress(&self) -> Duration {
        self.progress
    }

    /// Track duration; zero until metadata arrives.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// ID of the bound track.
    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    /// Whether the bound track has audio to play.
    pub fn can_play(&self) -> bool {
        self.has_media
    }

    /// Borrow the owned media resource.
    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Mutably borrow the owned media resource (e.g. so the host can
    /// point it at a newly bound track's media).
    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    // ===== Events =====

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events.
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Queue a position update event reflecting the current snapshot.
    pub fn emit_position_update(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: self.progress.as_millis() as u64,
            duration_ms: self.duration.as_millis() as u64,
        });
    }

    // ===== Internals =====

    /// Start the resource and record how to interpret the outcome.
    fn request_play(&mut self, intent: PlayIntent) {
        match self.resource.play() {
            PlayStart::Started => {
                self.is_playing = true;
            }
            PlayStart::Pending(ticket) => {
                debug!(?ticket, ?intent, "play request pending");
                self.pending_play = Some(PendingPlay { ticket, intent });
            }
        }
    }

    /// Start segment playback at the resource's current position and, when
    /// a start was requested, attach the settle watcher to converge on it.
    fn commence_segment_playback(&mut self, target: Option<Duration>) {
        self.seek_wait = None;

        let position = self.resource.position();
        self.set_progress(if position > Duration::ZERO {
            position
        } else {
            target.unwrap_or(Duration::ZERO)
        });

        if let Some(target) = target {
            self.settler = Some(SeekSettler::new(
                target,
                self.config.seek_tolerance,
                self.config.max_seek_attempts,
            ));
        }
        self.request_play(PlayIntent::Segment);
    }

    /// The boundary fired: stop exactly at the segment end.
    ///
    /// This is the only path by which segment playback ends naturally.
    fn finish_segment_at_boundary(&mut self) {
        let before = self.observable_state();
        let end = self.limiter.disarm();
        self.settler = None;
        self.seek_wait = None;
        self.pending_play = None;
        self.resource.pause();

        let segment = self.segment.take();
        let boundary = end
            .or_else(|| segment.as_ref().and_then(|s| s.end))
            .unwrap_or_else(|| self.resource.position());
        self.best_effort_seek(boundary);

        self.mode = PlaybackMode::Idle;
        self.is_playing = false;
        self.set_progress(boundary);

        if let Some(segment) = segment {
            self.pending_events
                .push(PlaybackEvent::SegmentFinished { card: segment.card });
        }
        self.emit_if_changed(before);
    }

    /// Commence playback once the seek-wait deadline passes without the
    /// resource ever confirming the seek.
    fn poll_seek_wait(&mut self, now: Instant) {
        let expired = self
            .seek_wait
            .as_ref()
            .is_some_and(|wait| wait.expired(now));
        if !expired {
            return;
        }

        let wait = self.seek_wait.take();
        if let Some(wait) = wait {
            debug!("seek completion signal never fired; starting anyway");
            let before = self.observable_state();
            self.commence_segment_playback(Some(wait.target()));
            self.emit_if_changed(before);
        }
    }

    /// Cancel every watcher and in-flight request of the current
    /// operation. Must run before any operation that repositions the
    /// resource for new intent.
    fn cancel_in_flight(&mut self) {
        self.limiter.disarm();
        self.settler = None;
        self.seek_wait = None;
        self.pending_play = None;
    }

    fn best_effort_seek(&mut self, position: Duration) {
        if let Err(err) = self.resource.seek(position) {
            warn!(
                position_secs = position.as_secs_f64(),
                %err,
                "ignoring failed seek"
            );
        }
    }

    fn set_progress(&mut self, position: Duration) {
        self.progress = if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        };
    }

    fn observable_state(&self) -> (PlaybackMode, bool) {
        (self.mode, self.is_playing)
    }

    fn emit_if_changed(&mut self, before: (PlaybackMode, bool)) {
        if before != self.observable_state() {
            self.emit_state_changed();
        }
    }

    fn emit_state_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::StateChanged {
            mode: self.mode,
            is_playing: self.is_playing,
        });
    }
}
