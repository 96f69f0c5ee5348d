//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track with audio is currently bound
    #[error("No track loaded")]
    NoTrackLoaded,

    /// A segment operation was issued with no segment active
    #[error("No active segment")]
    NoActiveSegment,

    /// The media resource refused a seek
    #[error("Seek failed: {0}")]
    Seek(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
