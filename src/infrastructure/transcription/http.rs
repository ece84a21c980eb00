//! Hosted transcription API adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TranscribeError, TranscribeOptions, Transcriber};
use crate::domain::analysis::{Transcript, TranscriptProvider};
use crate::domain::media::MediaData;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeRequest<'a> {
    audio_data: String,
    mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    options: &'a TranscribeOptions,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Transcriber over the hosted provider endpoints
pub struct HttpTranscriber {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTranscriber {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the per-provider endpoint URL
    fn api_url(&self, provider: TranscriptProvider) -> String {
        format!("{}/api/transcribe/{}", self.base_url, provider)
    }

    async fn error_from_body(response: reqwest::Response) -> TranscribeError {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => TranscribeError::ApiError(body.error),
            Err(_) => TranscribeError::ApiError(format!("HTTP {}", status)),
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(
        &self,
        audio: &MediaData,
        provider: TranscriptProvider,
        language: Option<&str>,
        options: &TranscribeOptions,
    ) -> Result<Transcript, TranscribeError> {
        let limit = provider.max_payload_bytes();
        if audio.size_bytes() > limit {
            return Err(TranscribeError::PayloadTooLarge {
                provider,
                got: audio.human_readable_size(),
                limit: format!("{:.0} MB", limit as f64 / (1024.0 * 1024.0)),
            });
        }

        let body = TranscribeRequest {
            audio_data: audio.to_base64(),
            mime_type: audio.mime_type().to_string(),
            language,
            options,
        };

        let response = self
            .client
            .post(self.api_url(provider))
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscribeError::RateLimited);
        }

        if !status.is_success() {
            return Err(Self::error_from_body(response).await);
        }

        let transcript: Transcript = response
            .json()
            .await
            .map_err(|e| TranscribeError::ParseError(e.to_string()))?;

        if transcript.is_empty() {
            return Err(TranscribeError::EmptyResponse);
        }

        Ok(transcript)
    }
}
