//! Analyze pitch use case: upload, transcribe, generate

use thiserror::Error;

use crate::domain::analysis::{MvpDocument, Transcript, TranscriptProvider};
use crate::domain::media::MediaData;

use super::ports::{
    AudioExtractor, DocumentGenerator, ExtractError, GenerateError, NotificationIcon, Notifier,
    PitchUploader, TranscribeError, TranscribeOptions, Transcriber, UploadError,
};

/// Errors from the analyze use case
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Audio extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscribeError),

    #[error("Document generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("The recording contains no recognizable speech")]
    EmptyTranscript,
}

/// Input parameters for the analyze use case
#[derive(Debug, Clone)]
pub struct AnalyzeInput {
    pub provider: TranscriptProvider,
    /// Optional BCP-47 language hint for transcription
    pub language: Option<String>,
    /// Whether to show notifications
    pub enable_notify: bool,
}

impl Default for AnalyzeInput {
    fn default() -> Self {
        Self {
            provider: TranscriptProvider::default(),
            language: None,
            enable_notify: false,
        }
    }
}

/// Output from the analyze use case
#[derive(Debug, Clone)]
pub struct PitchAnalysis {
    /// Server-side id of the uploaded recording
    pub file_id: String,
    pub transcript: Transcript,
    pub document: MvpDocument,
    /// Whether the audio came from local extraction or the server
    pub used_server_audio: bool,
}

/// Callbacks for stage progress updates
#[derive(Default)]
pub struct AnalyzeCallbacks {
    /// Called when the upload starts with the recording size
    pub on_upload_start: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when the upload finishes with the file id
    pub on_upload_end: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when transcription starts with the audio size
    pub on_transcribe_start: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when transcription finishes with the transcript text
    pub on_transcribe_end: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when generation starts
    pub on_generate_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when generation finishes
    pub on_generate_end: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Turns a finished pitch recording into an MVP document
pub struct AnalyzePitchUseCase<U, X, T, G, N>
where
    U: PitchUploader,
    X: AudioExtractor,
    T: Transcriber,
    G: DocumentGenerator,
    N: Notifier,
{
    uploader: U,
    extractor: X,
    transcriber: T,
    generator: G,
    notifier: N,
}

impl<U, X, T, G, N> AnalyzePitchUseCase<U, X, T, G, N>
where
    U: PitchUploader,
    X: AudioExtractor,
    T: Transcriber,
    G: DocumentGenerator,
    N: Notifier,
{
    pub fn new(uploader: U, extractor: X, transcriber: T, generator: G, notifier: N) -> Self {
        Self {
            uploader,
            extractor,
            transcriber,
            generator,
            notifier,
        }
    }

    /// Execute the analysis workflow
    pub async fn execute(
        &self,
        video: &MediaData,
        input: AnalyzeInput,
        callbacks: AnalyzeCallbacks,
    ) -> Result<PitchAnalysis, PipelineError> {
        if input.enable_notify {
            let _ = self
                .notifier
                .notify(
                    "PitchCast",
                    "Analyzing your pitch...",
                    NotificationIcon::Processing,
                )
                .await;
        }

        if let Some(ref cb) = callbacks.on_upload_start {
            cb(&video.human_readable_size());
        }

        let receipt = self.uploader.upload(video).await?;

        if let Some(ref cb) = callbacks.on_upload_end {
            cb(&receipt.file_id);
        }

        // Prefer locally extracted audio; fall back to the track the
        // server extracted when the container cannot be decoded here
        let (audio, used_server_audio) = match self.extractor.extract(video).await {
            Ok(audio) => (audio, false),
            Err(ExtractError::UnsupportedFormat(_)) => (receipt.audio.clone(), true),
            Err(e) => return Err(e.into()),
        };

        let limit = input.provider.max_payload_bytes();
        if audio.size_bytes() > limit {
            return Err(TranscribeError::PayloadTooLarge {
                provider: input.provider,
                got: audio.human_readable_size(),
                limit: format!("{:.0} MB", limit as f64 / (1024.0 * 1024.0)),
            }
            .into());
        }

        if let Some(ref cb) = callbacks.on_transcribe_start {
            cb(&audio.human_readable_size());
        }

        let transcript = self
            .transcriber
            .transcribe(
                &audio,
                input.provider,
                input.language.as_deref(),
                &TranscribeOptions::default(),
            )
            .await?;

        if transcript.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }

        if let Some(ref cb) = callbacks.on_transcribe_end {
            cb(&transcript.text);
        }

        if let Some(ref cb) = callbacks.on_generate_start {
            cb();
        }

        let document = self.generator.generate(&receipt.file_id).await?;

        if let Some(ref cb) = callbacks.on_generate_end {
            cb();
        }

        if input.enable_notify {
            let _ = self
                .notifier
                .notify(
                    "PitchCast",
                    "Your MVP document is ready!",
                    NotificationIcon::Success,
                )
                .await;
        }

        Ok(PitchAnalysis {
            file_id: receipt.file_id,
            transcript,
            document,
            used_server_audio,
        })
    }
}
