//! Native device enumeration
//!
//! Cameras come from nokhwa, microphones from cpal. Both enumerations
//! touch platform media APIs, so they run on the blocking pool.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use nokhwa::utils::{ApiBackend, CameraIndex};

use crate::application::ports::{DeviceEnumerator, EnumerationError};
use crate::domain::device::{DeviceDescriptor, DeviceKind};

pub struct NativeDeviceEnumerator;

impl NativeDeviceEnumerator {
    pub fn new() -> Self {
        Self
    }

    fn list_cameras() -> Result<Vec<DeviceDescriptor>, EnumerationError> {
        let cameras = nokhwa::query(ApiBackend::Auto)
            .map_err(|e| map_camera_error(&e.to_string()))?;

        Ok(cameras
            .into_iter()
            .map(|info| {
                let id = match info.index() {
                    CameraIndex::Index(i) => i.to_string(),
                    CameraIndex::String(s) => s.to_string(),
                };
                DeviceDescriptor::new(id, "", DeviceKind::Camera, info.human_name())
            })
            .collect())
    }

    fn list_microphones() -> Result<Vec<DeviceDescriptor>, EnumerationError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| map_microphone_error(&e.to_string()))?;

        Ok(devices
            .filter_map(|device| {
                // cpal names double as stable ids on every backend we target
                let name = device.name().ok()?;
                Some(DeviceDescriptor::new(
                    name.clone(),
                    "",
                    DeviceKind::Microphone,
                    name,
                ))
            })
            .collect())
    }
}

impl Default for NativeDeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

fn map_camera_error(message: &str) -> EnumerationError {
    if is_permission_message(message) {
        EnumerationError::PermissionDenied(DeviceKind::Camera)
    } else {
        EnumerationError::Backend(message.to_string())
    }
}

fn map_microphone_error(message: &str) -> EnumerationError {
    if is_permission_message(message) {
        EnumerationError::PermissionDenied(DeviceKind::Microphone)
    } else {
        EnumerationError::Backend(message.to_string())
    }
}

fn is_permission_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
}

#[async_trait]
impl DeviceEnumerator for NativeDeviceEnumerator {
    async fn prime_permission(&self, kind: DeviceKind) -> Result<(), EnumerationError> {
        // Opening the enumeration APIs is what triggers the OS prompt
        self.enumerate(kind).await.map(|_| ())
    }

    async fn enumerate(&self, kind: DeviceKind) -> Result<Vec<DeviceDescriptor>, EnumerationError> {
        let result = tokio::task::spawn_blocking(move || match kind {
            DeviceKind::Camera => Self::list_cameras(),
            DeviceKind::Microphone => Self::list_microphones(),
        })
        .await
        .map_err(|e| EnumerationError::Backend(format!("enumeration task failed: {}", e)))?;

        result
    }
}
