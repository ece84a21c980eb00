//! MVP document generation API adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{DocumentGenerator, GenerateError};
use crate::domain::analysis::MvpDocument;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    file_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Requests MVP documents from the analysis backend
pub struct DocumentClient {
    base_url: String,
    client: reqwest::Client,
}

impl DocumentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl DocumentGenerator for DocumentClient {
    async fn generate(&self, file_id: &str) -> Result<MvpDocument, GenerateError> {
        let response = self
            .client
            .post(self.api_url())
            .json(&GenerateRequest { file_id })
            .send()
            .await
            .map_err(|e| GenerateError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GenerateError::MissingTranscript(file_id.to_string()));
        }

        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP {}", status),
            };
            return Err(GenerateError::ApiError(message));
        }

        response
            .json()
            .await
            .map_err(|e| GenerateError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_appends_path() {
        let client = DocumentClient::new("https://api.example.com");
        assert_eq!(client.api_url(), "https://api.example.com/api/generate");
    }
}
