//! Recording primitive port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::media::MediaMimeType;
use crate::domain::recording::{Duration, RecordingFormat};

use super::capture::LiveStream;

/// Recorder errors
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    #[error("Format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Stream is not live")]
    StreamNotLive,

    #[error("Failed to start recorder: {0}")]
    StartFailed(String),

    #[error("Recorder failure: {0}")]
    Failed(String),
}

/// Port for the platform recording primitive.
///
/// The recorder consumes a live stream and emits encoded chunks on the
/// provided channel every `timeslice`. The final chunk is delivered
/// before `stop` returns.
#[async_trait]
pub trait MediaRecorder: Send + Sync {
    /// Whether the runtime can encode the given format
    fn supports(&self, format: RecordingFormat) -> bool;

    /// The container MIME the platform default format produces
    fn default_mime(&self) -> MediaMimeType;

    /// Start recording the stream, delivering chunks on `chunks`.
    async fn start(
        &self,
        stream: Arc<dyn LiveStream>,
        format: RecordingFormat,
        timeslice: Duration,
        chunks: mpsc::Sender<Vec<u8>>,
    ) -> Result<(), RecorderError>;

    /// Stop recording and flush the final chunk
    async fn stop(&self) -> Result<(), RecorderError>;

    /// Suspend chunk production without closing the encoder
    async fn pause(&self) -> Result<(), RecorderError>;

    /// Resume chunk production
    async fn resume(&self) -> Result<(), RecorderError>;
}
