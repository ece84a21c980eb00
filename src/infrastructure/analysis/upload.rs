//! Pitch upload API adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{PitchUploader, UploadError, UploadReceipt};
use crate::domain::media::{MediaData, MediaMimeType};

/// Server-side request body cap, enforced before sending
pub const MAX_UPLOAD_BYTES: usize = 30 * 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    video_data: String,
    mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: String,
    audio_data: String,
    mime_type: String,
    file_type: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Uploads recordings to the analysis backend
pub struct UploadClient {
    base_url: String,
    client: reqwest::Client,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api/upload", self.base_url)
    }
}

#[async_trait]
impl PitchUploader for UploadClient {
    async fn upload(&self, video: &MediaData) -> Result<UploadReceipt, UploadError> {
        if video.size_bytes() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                got: video.human_readable_size(),
                limit: format!("{} MB", MAX_UPLOAD_BYTES / (1024 * 1024)),
            });
        }

        let body = UploadRequest {
            video_data: video.to_base64(),
            mime_type: video.mime_type().to_string(),
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP {}", status),
            };
            return Err(UploadError::Rejected(message));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::ParseError(e.to_string()))?;

        let audio_mime = MediaMimeType::parse(&body.mime_type)
            .ok_or_else(|| UploadError::ParseError(format!("unknown mime: {}", body.mime_type)))?;
        let audio = MediaData::from_base64(&body.audio_data, audio_mime)
            .ok_or_else(|| UploadError::ParseError("audioData is not valid base64".to_string()))?;
        let file_type = MediaMimeType::parse(&body.file_type)
            .ok_or_else(|| UploadError::ParseError(format!("unknown mime: {}", body.file_type)))?;

        Ok(UploadReceipt {
            file_id: body.file_id,
            audio,
            file_type,
        })
    }
}
