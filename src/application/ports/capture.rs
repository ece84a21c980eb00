//! Live media stream port interfaces

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Requested device not found: {0}")]
    NotFound(String),

    #[error("Stream initialization timed out")]
    Timeout,

    #[error("Hardware error: {0}")]
    Hardware(String),
}

/// Video orientation classes the constraint policy distinguishes.
/// Compact hosts (narrow windows) get portrait video, everything else
/// gets landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Compact,
    Standard,
}

impl FormFactor {
    /// Ideal (width, height) for this form factor
    pub const fn ideal_resolution(&self) -> (u32, u32) {
        match self {
            Self::Compact => (720, 1280),
            Self::Standard => (1280, 720),
        }
    }
}

/// Requested video properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
}

/// Requested audio properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub sample_rate: u32,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            sample_rate: 44_100,
        }
    }
}

/// A request to open a combined camera/microphone stream
#[derive(Debug, Clone)]
pub struct StreamRequest {
    /// Camera device id; `None` asks for the platform default camera
    pub camera_id: Option<String>,
    /// Microphone device id; `None` asks for the platform default
    pub microphone_id: Option<String>,
    pub video: VideoConstraints,
    pub audio: AudioConstraints,
}

impl StreamRequest {
    /// Build a request for the given devices with the constraint
    /// policy applied for the host's form factor.
    pub fn for_devices(
        camera_id: Option<String>,
        microphone_id: Option<String>,
        form_factor: FormFactor,
    ) -> Self {
        let (ideal_width, ideal_height) = form_factor.ideal_resolution();
        Self {
            camera_id,
            microphone_id,
            video: VideoConstraints {
                ideal_width,
                ideal_height,
            },
            audio: AudioConstraints::default(),
        }
    }

}

/// Shared view of the microphone samples a live stream is producing.
/// Mono samples at the device rate, appended by the capture backend.
#[derive(Clone)]
pub struct AudioTap {
    pub samples: Arc<Mutex<Vec<i16>>>,
    pub sample_rate: u32,
}

impl AudioTap {
    /// Most seconds of audio kept between drains. A live preview with
    /// no recording draining the tap stays bounded.
    pub const MAX_BUFFERED_SECS: usize = 30;

    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Arc::new(Mutex::new(Vec::new())),
            sample_rate,
        }
    }

    /// Append samples, discarding the oldest beyond the buffer cap
    pub fn push(&self, data: &[i16]) {
        let cap = self.sample_rate as usize * Self::MAX_BUFFERED_SECS;
        if let Ok(mut guard) = self.samples.lock() {
            guard.extend_from_slice(data);
            if guard.len() > cap {
                let excess = guard.len() - cap;
                guard.drain(..excess);
            }
        }
    }

    /// Take all buffered samples, leaving the tap empty
    pub fn drain(&self) -> Vec<i16> {
        match self.samples.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => Vec::new(),
        }
    }
}

/// A live camera/microphone stream with exclusive hardware ownership.
///
/// Dropping the handle does not release the hardware; callers must
/// `stop()` the stream they created. `stop()` is idempotent.
pub trait LiveStream: Send + Sync {
    /// Unique id of this stream instance
    fn id(&self) -> Uuid;

    /// The camera device id actually opened
    fn camera_id(&self) -> &str;

    /// The microphone device id actually opened, if audio is present
    fn microphone_id(&self) -> Option<&str>;

    /// Whether the tracks are still producing frames
    fn is_live(&self) -> bool;

    /// Stop all tracks and release the hardware
    fn stop(&self);

    /// Access the live audio samples, if the stream has audio
    fn audio_tap(&self) -> Option<AudioTap>;
}

/// Port for opening live capture streams
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Open a stream satisfying the request.
    ///
    /// # Returns
    /// The live stream, or an error classifying the failure
    async fn open(&self, request: StreamRequest) -> Result<Arc<dyn LiveStream>, CaptureError>;
}
