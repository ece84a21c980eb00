//! Configuration storage port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::PreferenceError;

/// Port for configuration storage.
///
/// Device selections live inside AppConfig, so persisting a selection
/// is a read-modify-write through this port.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage.
    ///
    /// # Returns
    /// The loaded config (may have None fields if file doesn't exist)
    async fn load(&self) -> Result<AppConfig, PreferenceError>;

    /// Save configuration to storage.
    async fn save(&self, config: &AppConfig) -> Result<(), PreferenceError>;

    /// Get the configuration file path.
    fn path(&self) -> PathBuf;

    /// Check if configuration file exists.
    fn exists(&self) -> bool;

    /// Initialize configuration file with defaults.
    /// Fails if file already exists.
    async fn init(&self) -> Result<(), PreferenceError>;
}
