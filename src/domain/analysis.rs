//! Transcript and MVP document value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidProviderError;

/// Hosted transcription provider classes.
///
/// The web-speech provider of the original product is browser-only and
/// has no server endpoint, so it does not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranscriptProvider {
    #[default]
    Whisper,
    Deepgram,
}

impl TranscriptProvider {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Whisper => "whisper",
            Self::Deepgram => "deepgram",
        }
    }

    /// Per-provider audio payload cap, enforced client-side before upload
    pub const fn max_payload_bytes(&self) -> usize {
        match self {
            Self::Whisper => 25 * 1024 * 1024,
            Self::Deepgram => 2 * 1024 * 1024 * 1024,
        }
    }
}

impl fmt::Display for TranscriptProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TranscriptProvider {
    type Err = InvalidProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whisper" => Ok(Self::Whisper),
            "deepgram" => Ok(Self::Deepgram),
            _ => Err(InvalidProviderError { input: s.to_string() }),
        }
    }
}

/// A single word with timing, when the provider supplies word-level data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// A diarized speaker turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub speaker: u32,
    pub text: String,
}

/// Transcription result returned by a provider endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub text: String,
    /// Audio duration in seconds as reported by the provider
    pub duration: f64,
    pub language: String,
    pub confidence: Option<f32>,
    #[serde(default)]
    pub words: Vec<WordTiming>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub speakers: Vec<SpeakerTurn>,
    /// Provider-side processing time in milliseconds
    #[serde(default)]
    pub processing_time: u64,
}

impl Transcript {
    /// Whether the provider returned any usable text
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Token accounting reported by the generation endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Generated MVP document (markdown) plus usage accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MvpDocument {
    pub content: String,
    #[serde(default)]
    pub usage: TokenUsage,
}
