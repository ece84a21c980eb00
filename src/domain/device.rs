//! Capture device descriptors and persisted selections

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two capture device classes the recorder cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Camera,
    Microphone,
}

impl DeviceKind {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Microphone => "microphone",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A capture device as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Platform-stable device id; empty before permission is granted
    pub id: String,
    /// Physical-device grouping id, shared by e.g. a webcam's camera
    /// and built-in microphone. May be empty on some platforms.
    pub group_id: String,
    pub kind: DeviceKind,
    /// Human-readable label; empty before permission is granted
    pub label: String,
}

impl DeviceDescriptor {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        kind: DeviceKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            kind,
            label: label.into(),
        }
    }

    /// Placeholder entries with an empty id show up when enumeration
    /// runs before permission is granted. They cannot be opened.
    pub fn is_enumeration_artifact(&self) -> bool {
        self.id.is_empty()
    }

    /// Best-effort guess that this camera faces the user, based on the
    /// label conventions platforms actually use.
    pub fn looks_front_facing(&self) -> bool {
        let label = self.label.to_lowercase();
        label.contains("front") || label.contains("facetime") || label.contains("integrated")
    }

    /// Display name, falling back to a generic one when the label is
    /// unavailable.
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("Unknown {}", self.kind)
        } else {
            self.label.clone()
        }
    }
}

/// Pick the camera most likely to face the user, falling back to the
/// first camera in the list. Returns `None` when no cameras exist.
pub fn prefer_front_camera(devices: &[DeviceDescriptor]) -> Option<&DeviceDescriptor> {
    let cameras: Vec<&DeviceDescriptor> = devices
        .iter()
        .filter(|d| d.kind == DeviceKind::Camera && !d.is_enumeration_artifact())
        .collect();
    cameras
        .iter()
        .find(|d| d.looks_front_facing())
        .copied()
        .or_else(|| cameras.first().copied())
}

/// Persisted device selections, restored across sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePreferences {
    pub camera_id: Option<String>,
    pub microphone_id: Option<String>,
}

impl DevicePreferences {
    /// Get the stored id for a device kind
    pub fn get(&self, kind: DeviceKind) -> Option<&str> {
        match kind {
            DeviceKind::Camera => self.camera_id.as_deref(),
            DeviceKind::Microphone => self.microphone_id.as_deref(),
        }
    }

    /// Store the id for a device kind
    pub fn set(&mut self, kind: DeviceKind, id: Option<String>) {
        match kind {
            DeviceKind::Camera => self.camera_id = id,
            DeviceKind::Microphone => self.microphone_id = id,
        }
    }
}
