//! Device enumeration port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::device::{DeviceDescriptor, DeviceKind};

/// Enumeration errors
#[derive(Debug, Clone, Error)]
pub enum EnumerationError {
    #[error("Permission denied for {0} access")]
    PermissionDenied(DeviceKind),

    #[error("Device backend error: {0}")]
    Backend(String),
}

/// Port for listing capture devices
#[async_trait]
pub trait DeviceEnumerator: Send + Sync {
    /// Request access to a device class so later enumeration returns
    /// real ids and labels instead of placeholders.
    ///
    /// # Returns
    /// Ok(()) when access is available, PermissionDenied otherwise
    async fn prime_permission(&self, kind: DeviceKind) -> Result<(), EnumerationError>;

    /// List devices of the given kind.
    ///
    /// May return placeholder entries (empty id and label) when
    /// permission has not been granted yet.
    async fn enumerate(&self, kind: DeviceKind) -> Result<Vec<DeviceDescriptor>, EnumerationError>;
}
