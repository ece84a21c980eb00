//! Upload, audio extraction and document generation port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::analysis::MvpDocument;
use crate::domain::media::{MediaData, MediaMimeType};

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("Recording is {got} but the upload limit is {limit}")]
    TooLarge { got: String, limit: String },

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Upload request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse upload response: {0}")]
    ParseError(String),
}

/// What the upload endpoint hands back: a server-side file id plus the
/// audio track it extracted from the video.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub file_id: String,
    /// Server-extracted audio, usable when local extraction cannot
    /// decode the container
    pub audio: MediaData,
    pub file_type: MediaMimeType,
}

/// Port for uploading a recorded pitch
#[async_trait]
pub trait PitchUploader: Send + Sync {
    /// Upload the recording.
    ///
    /// # Returns
    /// A receipt with the stored file id and server-extracted audio
    async fn upload(&self, video: &MediaData) -> Result<UploadReceipt, UploadError>;
}

/// Generation errors
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("No transcript available for file: {0}")]
    MissingTranscript(String),

    #[error("Generation request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse generation response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Port for generating the MVP document from a stored transcript
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Generate the document for an uploaded and transcribed pitch.
    ///
    /// # Arguments
    /// * `file_id` - The id returned by the upload
    async fn generate(&self, file_id: &str) -> Result<MvpDocument, GenerateError>;
}

/// Extraction errors
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("Cannot decode container format: {0}")]
    UnsupportedFormat(MediaMimeType),

    #[error("Extraction failed: {0}")]
    Failed(String),
}

/// Port for extracting the audio track from a recorded video
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Extract audio suitable for transcription.
    ///
    /// # Returns
    /// The audio track, or UnsupportedFormat when the container cannot
    /// be decoded locally (callers fall back to server extraction)
    async fn extract(&self, video: &MediaData) -> Result<MediaData, ExtractError>;
}
