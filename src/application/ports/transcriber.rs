//! Transcription port interface

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::analysis::{Transcript, TranscriptProvider};
use crate::domain::media::MediaData;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscribeError {
    #[error("Audio is {got} but the {provider} limit is {limit}")]
    PayloadTooLarge {
        provider: TranscriptProvider,
        got: String,
        limit: String,
    },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Provider-specific transcription switches
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeOptions {
    pub punctuate: bool,
    pub diarize: bool,
    pub paragraphs: bool,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            punctuate: true,
            diarize: false,
            paragraphs: true,
        }
    }
}

/// Port for hosted audio transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio through the named provider.
    ///
    /// # Arguments
    /// * `audio` - The audio data to transcribe
    /// * `provider` - Which hosted provider to use
    /// * `language` - Optional BCP-47 language hint
    /// * `options` - Provider switches
    ///
    /// # Returns
    /// The transcript or an error
    async fn transcribe(
        &self,
        audio: &MediaData,
        provider: TranscriptProvider,
        language: Option<&str>,
        options: &TranscribeOptions,
    ) -> Result<Transcript, TranscribeError>;
}
