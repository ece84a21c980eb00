//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod analysis;
pub mod capture;
pub mod config;
pub mod devices;
pub mod notifier;
pub mod recorder;
pub mod surface;
pub mod transcriber;

// Re-export common types
pub use analysis::{
    AudioExtractor, DocumentGenerator, ExtractError, GenerateError, PitchUploader, UploadError,
    UploadReceipt,
};
pub use capture::{
    AudioTap, CaptureBackend, CaptureError, FormFactor, LiveStream, StreamRequest,
};
pub use config::ConfigStore;
pub use devices::{DeviceEnumerator, EnumerationError};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use recorder::{MediaRecorder, RecorderError};
pub use surface::{SurfaceError, VideoSurface};
pub use transcriber::{TranscribeError, TranscribeOptions, Transcriber};
