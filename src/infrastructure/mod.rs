//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the capture hardware, the analysis API, etc.

pub mod analysis;
pub mod capture;
pub mod devices;
pub mod notification;
pub mod preferences;
pub mod recording;
pub mod surface;
pub mod transcription;

// Re-export adapters
pub use analysis::{DocumentClient, UploadClient, WavAudioExtractor};
pub use capture::NativeCaptureBackend;
pub use devices::NativeDeviceEnumerator;
pub use notification::NotifyRustNotifier;
pub use preferences::XdgConfigStore;
pub use recording::WavChunkRecorder;
pub use surface::TerminalSurface;
pub use transcription::HttpTranscriber;
