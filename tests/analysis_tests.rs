//! Analysis pipeline integration tests against a mock API server

use base64::Engine;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pitchcast::application::ports::{
    DocumentGenerator, NotificationError, NotificationIcon, Notifier, PitchUploader,
    TranscribeError, TranscribeOptions, Transcriber, UploadError,
};
use pitchcast::application::{AnalyzeCallbacks, AnalyzeInput, AnalyzePitchUseCase};
use pitchcast::domain::analysis::TranscriptProvider;
use pitchcast::domain::media::{MediaData, MediaMimeType};
use pitchcast::infrastructure::recording::wav;
use pitchcast::infrastructure::{
    DocumentClient, HttpTranscriber, UploadClient, WavAudioExtractor,
};

struct SilentNotifier;

#[async_trait::async_trait]
impl Notifier for SilentNotifier {
    async fn notify(
        &self,
        _title: &str,
        _message: &str,
        _icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// A small streaming-WAV recording like the chunk recorder produces
fn sample_recording() -> MediaData {
    let samples: Vec<i16> = (0..4410).map(|i| ((i % 80) * 100) as i16).collect();
    let mut blob = wav::streaming_header(44_100, 1).to_vec();
    blob.extend_from_slice(&wav::samples_to_bytes(&samples));
    MediaData::new(blob, MediaMimeType::Wav)
}

fn transcript_json(text: &str) -> serde_json::Value {
    json!({
        "text": text,
        "duration": 1.5,
        "language": "en",
        "confidence": 0.93,
        "processingTime": 412
    })
}

#[tokio::test]
async fn upload_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_partial_json(json!({ "mimeType": "audio/wav" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "file-123",
            "audioData": b64(&[1u8, 2, 3]),
            "mimeType": "audio/wav",
            "fileType": "video/mp4"
        })))
        .mount(&server)
        .await;

    let client = UploadClient::new(server.uri());
    let receipt = client.upload(&sample_recording()).await.unwrap();

    assert_eq!(receipt.file_id, "file-123");
    assert_eq!(receipt.audio.data(), &[1, 2, 3]);
    assert_eq!(receipt.audio.mime_type(), MediaMimeType::Wav);
    assert_eq!(receipt.file_type, MediaMimeType::Mp4);
}

#[tokio::test]
async fn upload_surfaces_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Unsupported container" })),
        )
        .mount(&server)
        .await;

    let client = UploadClient::new(server.uri());
    let err = client.upload(&sample_recording()).await.unwrap_err();

    match err {
        UploadError::Rejected(message) => assert_eq!(message, "Unsupported container"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn transcribe_hits_provider_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transcribe/deepgram"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(transcript_json("we solve parking")),
        )
        .mount(&server)
        .await;

    let transcriber = HttpTranscriber::new(server.uri());
    let audio = MediaData::new(vec![0u8; 128], MediaMimeType::Wav);
    let transcript = transcriber
        .transcribe(
            &audio,
            TranscriptProvider::Deepgram,
            Some("en"),
            &TranscribeOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(transcript.text, "we solve parking");
    assert_eq!(transcript.processing_time, 412);
}

#[tokio::test]
async fn transcribe_maps_rate_limiting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transcribe/whisper"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let transcriber = HttpTranscriber::new(server.uri());
    let audio = MediaData::new(vec![0u8; 128], MediaMimeType::Wav);
    let err = transcriber
        .transcribe(
            &audio,
            TranscriptProvider::Whisper,
            None,
            &TranscribeOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TranscribeError::RateLimited));
}

#[tokio::test]
async fn transcribe_rejects_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transcribe/whisper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcript_json("   ")))
        .mount(&server)
        .await;

    let transcriber = HttpTranscriber::new(server.uri());
    let audio = MediaData::new(vec![0u8; 128], MediaMimeType::Wav);
    let err = transcriber
        .transcribe(
            &audio,
            TranscriptProvider::Whisper,
            None,
            &TranscribeOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TranscribeError::EmptyResponse));
}

#[tokio::test]
async fn generate_returns_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "fileId": "file-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "# MVP Plan",
            "usage": { "promptTokens": 200, "completionTokens": 450, "totalTokens": 650 }
        })))
        .mount(&server)
        .await;

    let client = DocumentClient::new(server.uri());
    let document = client.generate("file-9").await.unwrap();

    assert_eq!(document.content, "# MVP Plan");
    assert_eq!(document.usage.total_tokens, 650);
}

#[tokio::test]
async fn generate_maps_missing_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = DocumentClient::new(server.uri());
    let err = client.generate("gone").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("gone"), "unexpected error: {}", message);
}

#[tokio::test]
async fn full_pipeline_uses_local_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "file-42",
            "audioData": b64(&[9u8, 9, 9]),
            "mimeType": "audio/wav",
            "fileType": "audio/wav"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/transcribe/whisper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcript_json(
            "our product finds parking in real time",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "# Parking MVP",
            "usage": { "totalTokens": 512 }
        })))
        .mount(&server)
        .await;

    let use_case = AnalyzePitchUseCase::new(
        UploadClient::new(server.uri()),
        WavAudioExtractor::new(),
        HttpTranscriber::new(server.uri()),
        DocumentClient::new(server.uri()),
        SilentNotifier,
    );

    let analysis = use_case
        .execute(
            &sample_recording(),
            AnalyzeInput {
                provider: TranscriptProvider::Whisper,
                language: Some("en".to_string()),
                enable_notify: false,
            },
            AnalyzeCallbacks::default(),
        )
        .await
        .unwrap();

    assert_eq!(analysis.file_id, "file-42");
    assert_eq!(analysis.transcript.text, "our product finds parking in real time");
    assert_eq!(analysis.document.content, "# Parking MVP");
    // The WAV recording was decodable locally
    assert!(!analysis.used_server_audio);
}
