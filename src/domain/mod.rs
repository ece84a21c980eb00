//! Domain layer: value objects, state machines and domain errors

pub mod analysis;
pub mod config;
pub mod device;
pub mod error;
pub mod media;
pub mod recording;

pub use analysis::{MvpDocument, TokenUsage, Transcript, TranscriptProvider};
pub use config::AppConfig;
pub use device::{DeviceDescriptor, DeviceKind, DevicePreferences};
pub use media::{MediaData, MediaMimeType};
