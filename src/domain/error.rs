//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an invalid transcription provider is named
#[derive(Debug, Clone, Error)]
#[error("Invalid provider: \"{input}\". Valid providers are: whisper, deepgram")]
pub struct InvalidProviderError {
    pub input: String,
}

/// Error when the preference/config store fails
#[derive(Debug, Clone, Error)]
pub enum PreferenceError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when an invalid orchestrator phase transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid phase transition: cannot {action} while in {phase} phase")]
pub struct InvalidPhaseTransition {
    pub phase: String,
    pub action: String,
}
