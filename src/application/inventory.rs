//! Device inventory use case

use thiserror::Error;

use crate::domain::device::{prefer_front_camera, DeviceDescriptor, DeviceKind};
use crate::domain::error::PreferenceError;

use super::ports::{ConfigStore, DeviceEnumerator, EnumerationError};

/// Errors from the inventory use case
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Device enumeration failed: {0}")]
    Enumeration(#[from] EnumerationError),

    #[error("Preference store failed: {0}")]
    Preferences(#[from] PreferenceError),

    #[error("No {kind} with id '{id}' is connected")]
    UnknownDevice { kind: DeviceKind, id: String },
}

/// A device listing plus the permission state it was taken under
#[derive(Debug, Clone)]
pub struct DeviceListing {
    pub devices: Vec<DeviceDescriptor>,
    /// True when the platform refused access, meaning labels and ids
    /// may be incomplete
    pub permission_denied: bool,
}

/// Lists capture devices and keeps the persisted selection in sync
/// with what is actually connected.
pub struct DeviceInventory<E, S>
where
    E: DeviceEnumerator,
    S: ConfigStore,
{
    enumerator: E,
    store: S,
}

impl<E, S> DeviceInventory<E, S>
where
    E: DeviceEnumerator,
    S: ConfigStore,
{
    pub fn new(enumerator: E, store: S) -> Self {
        Self { enumerator, store }
    }

    /// List devices of one kind, filtering out the placeholder entries
    /// enumeration produces before permission is granted.
    pub async fn list(&self, kind: DeviceKind) -> Result<DeviceListing, InventoryError> {
        let permission_denied = match self.enumerator.prime_permission(kind).await {
            Ok(()) => false,
            Err(EnumerationError::PermissionDenied(_)) => true,
            Err(e) => return Err(e.into()),
        };

        let mut devices = self.enumerator.enumerate(kind).await?;
        devices.retain(|d| !d.is_enumeration_artifact());

        Ok(DeviceListing {
            devices,
            permission_denied,
        })
    }

    /// List cameras and microphones together
    pub async fn list_all(&self) -> Result<DeviceListing, InventoryError> {
        let cameras = self.list(DeviceKind::Camera).await?;
        let microphones = self.list(DeviceKind::Microphone).await?;

        let mut devices = cameras.devices;
        devices.extend(microphones.devices);

        Ok(DeviceListing {
            devices,
            permission_denied: cameras.permission_denied || microphones.permission_denied,
        })
    }

    /// Resolve the device to use for a kind: the persisted selection
    /// when it is still connected, otherwise a sensible default (the
    /// front-most camera, or the first device). `None` when nothing of
    /// that kind is connected.
    pub async fn restore_or_default(
        &self,
        kind: DeviceKind,
    ) -> Result<Option<DeviceDescriptor>, InventoryError> {
        let listing = self.list(kind).await?;
        let preferences = self.store.load().await?.device_preferences();

        if let Some(stored_id) = preferences.get(kind) {
            if let Some(device) = listing.devices.iter().find(|d| d.id == stored_id) {
                return Ok(Some(device.clone()));
            }
        }

        let default = match kind {
            DeviceKind::Camera => prefer_front_camera(&listing.devices).cloned(),
            DeviceKind::Microphone => listing.devices.first().cloned(),
        };
        Ok(default)
    }

    /// Persist a device selection after validating it is connected
    pub async fn select(&self, kind: DeviceKind, id: &str) -> Result<(), InventoryError> {
        let listing = self.list(kind).await?;
        if !listing.devices.iter().any(|d| d.id == id) {
            return Err(InventoryError::UnknownDevice {
                kind,
                id: id.to_string(),
            });
        }

        let mut config = self.store.load().await?;
        let mut preferences = config.device_preferences();
        preferences.set(kind, Some(id.to_string()));
        config.set_device_preferences(&preferences);
        self.store.save(&config).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::AppConfig;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct FakeEnumerator {
        devices: Vec<DeviceDescriptor>,
        deny_permission: bool,
    }

    #[async_trait]
    impl DeviceEnumerator for FakeEnumerator {
        async fn prime_permission(&self, kind: DeviceKind) -> Result<(), EnumerationError> {
            if self.deny_permission {
                Err(EnumerationError::PermissionDenied(kind))
            } else {
                Ok(())
            }
        }

        async fn enumerate(
            &self,
            kind: DeviceKind,
        ) -> Result<Vec<DeviceDescriptor>, EnumerationError> {
            Ok(self
                .devices
                .iter()
                .filter(|d| d.kind == kind)
                .cloned()
                .collect())
        }
    }

    struct MemoryStore {
        config: Mutex<AppConfig>,
    }

    impl MemoryStore {
        fn new(config: AppConfig) -> Self {
            Self {
                config: Mutex::new(config),
            }
        }
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn load(&self) -> Result<AppConfig, PreferenceError> {
            Ok(self.config.lock().unwrap().clone())
        }

        async fn save(&self, config: &AppConfig) -> Result<(), PreferenceError> {
            *self.config.lock().unwrap() = config.clone();
            Ok(())
        }

        fn path(&self) -> PathBuf {
            PathBuf::from("/tmp/memory")
        }

        fn exists(&self) -> bool {
            true
        }

        async fn init(&self) -> Result<(), PreferenceError> {
            Ok(())
        }
    }

    fn camera(id: &str, label: &str) -> DeviceDescriptor {
        DeviceDescriptor::new(id, "", DeviceKind::Camera, label)
    }

    fn microphone(id: &str, label: &str) -> DeviceDescriptor {
        DeviceDescriptor::new(id, "", DeviceKind::Microphone, label)
    }

    fn inventory(
        devices: Vec<DeviceDescriptor>,
        deny_permission: bool,
        config: AppConfig,
    ) -> DeviceInventory<FakeEnumerator, MemoryStore> {
        DeviceInventory::new(
            FakeEnumerator {
                devices,
                deny_permission,
            },
            MemoryStore::new(config),
        )
    }

    #[tokio::test]
    async fn list_filters_enumeration_artifacts() {
        let inv = inventory(
            vec![camera("", ""), camera("cam-0", "USB Camera")],
            false,
            AppConfig::empty(),
        );

        let listing = inv.list(DeviceKind::Camera).await.unwrap();
        assert_eq!(listing.devices.len(), 1);
        assert_eq!(listing.devices[0].id, "cam-0");
        assert!(!listing.permission_denied);
    }

    #[tokio::test]
    async fn list_reports_permission_denied() {
        let inv = inventory(vec![camera("cam-0", "Cam")], true, AppConfig::empty());

        let listing = inv.list(DeviceKind::Camera).await.unwrap();
        assert!(listing.permission_denied);
    }

    #[tokio::test]
    async fn list_all_combines_kinds() {
        let inv = inventory(
            vec![camera("cam-0", "Cam"), microphone("mic-0", "Mic")],
            false,
            AppConfig::empty(),
        );

        let listing = inv.list_all().await.unwrap();
        assert_eq!(listing.devices.len(), 2);
    }

    #[tokio::test]
    async fn restore_uses_persisted_selection() {
        let config = AppConfig {
            camera: Some("cam-1".to_string()),
            ..Default::default()
        };
        let inv = inventory(
            vec![camera("cam-0", "A"), camera("cam-1", "B")],
            false,
            config,
        );

        let device = inv
            .restore_or_default(DeviceKind::Camera)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(device.id, "cam-1");
    }

    #[tokio::test]
    async fn restore_falls_back_when_device_unplugged() {
        let config = AppConfig {
            camera: Some("gone".to_string()),
            ..Default::default()
        };
        let inv = inventory(
            vec![camera("back", "Back Camera"), camera("front", "Front Camera")],
            false,
            config,
        );

        let device = inv
            .restore_or_default(DeviceKind::Camera)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(device.id, "front");
    }

    #[tokio::test]
    async fn restore_returns_none_without_devices() {
        let inv = inventory(vec![], false, AppConfig::empty());
        assert!(inv
            .restore_or_default(DeviceKind::Camera)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn select_persists_valid_device() {
        let inv = inventory(vec![microphone("mic-0", "Mic")], false, AppConfig::empty());

        inv.select(DeviceKind::Microphone, "mic-0").await.unwrap();

        let saved = inv.store.load().await.unwrap();
        assert_eq!(saved.microphone, Some("mic-0".to_string()));
    }

    #[tokio::test]
    async fn select_rejects_unknown_device() {
        let inv = inventory(vec![], false, AppConfig::empty());
        let err = inv.select(DeviceKind::Camera, "ghost").await.unwrap_err();
        assert!(matches!(err, InventoryError::UnknownDevice { .. }));
    }
}
