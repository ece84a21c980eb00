//! Transcription API adapters

pub mod http;

pub use http::HttpTranscriber;
