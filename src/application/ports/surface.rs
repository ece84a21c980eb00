//! Video surface port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::capture::LiveStream;

/// Surface errors
#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("Stream is not live")]
    StreamNotLive,

    #[error("Media failed to load: {0}")]
    LoadFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Port for the single video display surface.
///
/// Attach methods resolve only once the surface is actually showing
/// content (first frame metadata for streams, playable data for
/// recordings), so callers can sequence on "visible, no black frame".
#[async_trait]
pub trait VideoSurface: Send + Sync {
    /// Show a live stream, muted (the user should not hear themselves)
    async fn attach_stream(&self, stream: Arc<dyn LiveStream>) -> Result<(), SurfaceError>;

    /// Show a finished recording from its local URL, with audio
    async fn attach_playback(&self, url: &str) -> Result<(), SurfaceError>;

    /// Clear the surface source. Never stops live tracks.
    async fn detach(&self) -> Result<(), SurfaceError>;

    /// Start playback of an attached recording
    async fn play(&self) -> Result<(), SurfaceError>;

    /// Pause playback of an attached recording
    async fn pause_playback(&self) -> Result<(), SurfaceError>;

    /// Current playback position in seconds
    async fn position_secs(&self) -> f64;

    /// Whether the surface currently has a source attached
    fn has_source(&self) -> bool;
}
