//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::analysis::TranscriptProvider;
use crate::domain::recording::Duration;

/// PitchCast - record and analyze your startup pitch
#[derive(Parser, Debug)]
#[command(name = "pitchcast")]
#[command(version = "1.0.0")]
#[command(about = "Record a pitch on camera and turn it into an MVP document")]
#[command(long_about = None)]
pub struct Cli {
    /// Camera device id (see: pitchcast devices)
    #[arg(long, value_name = "ID")]
    pub camera: Option<String>,

    /// Microphone device id (see: pitchcast devices)
    #[arg(long, value_name = "ID")]
    pub microphone: Option<String>,

    /// Maximum recording duration (e.g., 90s, 2m)
    #[arg(short = 'm', long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Countdown before recording starts (e.g., 3s)
    #[arg(long, value_name = "TIME")]
    pub countdown: Option<String>,

    /// Transcription provider
    #[arg(short = 'p', long, value_name = "PROVIDER")]
    pub provider: Option<ProviderArg>,

    /// Language hint for transcription (e.g., en, de)
    #[arg(short = 'l', long, value_name = "LANG")]
    pub language: Option<String>,

    /// Analysis API base URL
    #[arg(long, value_name = "URL", env = "PITCHCAST_API_BASE")]
    pub api_base: Option<String>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Request portrait video for narrow displays
    #[arg(long)]
    pub compact: bool,

    /// Save the recording to this file as well
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<std::path::PathBuf>,

    /// Record only, skip the analysis pipeline
    #[arg(long)]
    pub no_analyze: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List or select capture devices
    Devices {
        #[command(subcommand)]
        action: Option<DeviceAction>,
    },
    /// Analyze an existing recording file
    Analyze {
        /// Path to a WAV recording
        file: std::path::PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Device subcommand actions
#[derive(Subcommand, Debug)]
pub enum DeviceAction {
    /// List available cameras and microphones
    List,
    /// Persist a device choice for future runs
    Select {
        /// Device class to select
        #[arg(value_enum)]
        kind: DeviceKindArg,
        /// Device id
        id: String,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Device kind argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceKindArg {
    Camera,
    Microphone,
}

impl From<DeviceKindArg> for crate::domain::device::DeviceKind {
    fn from(arg: DeviceKindArg) -> Self {
        match arg {
            DeviceKindArg::Camera => Self::Camera,
            DeviceKindArg::Microphone => Self::Microphone,
        }
    }
}

/// Provider argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Whisper,
    Deepgram,
}

impl From<ProviderArg> for TranscriptProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Whisper => TranscriptProvider::Whisper,
            ProviderArg::Deepgram => TranscriptProvider::Deepgram,
        }
    }
}

/// Parsed options for a recording run
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub camera: Option<String>,
    pub microphone: Option<String>,
    pub max_duration: Duration,
    pub countdown: Duration,
    pub compact: bool,
    pub notify: bool,
    pub output: Option<std::path::PathBuf>,
}

/// Parsed options for the analysis pipeline
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub provider: TranscriptProvider,
    pub language: Option<String>,
    pub api_base: String,
    pub notify: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "camera",
    "microphone",
    "max_duration",
    "countdown",
    "provider",
    "language",
    "api_base",
    "notify",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
