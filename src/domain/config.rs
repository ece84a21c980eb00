//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::analysis::TranscriptProvider;
use crate::domain::device::DevicePreferences;
use crate::domain::recording::Duration;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Last-selected camera device id
    pub camera: Option<String>,
    /// Last-selected microphone device id
    pub microphone: Option<String>,
    pub max_duration: Option<String>,
    pub countdown: Option<String>,
    pub provider: Option<String>,
    pub language: Option<String>,
    /// Base URL for the upload/transcription/generation endpoints
    pub api_base: Option<String>,
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            camera: None,
            microphone: None,
            max_duration: Some("2m".to_string()),
            countdown: Some("3s".to_string()),
            provider: Some("whisper".to_string()),
            language: None,
            api_base: None,
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            camera: other.camera.or(self.camera),
            microphone: other.microphone.or(self.microphone),
            max_duration: other.max_duration.or(self.max_duration),
            countdown: other.countdown.or(self.countdown),
            provider: other.provider.or(self.provider),
            language: other.language.or(self.language),
            api_base: other.api_base.or(self.api_base),
            notify: other.notify.or(self.notify),
        }
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_recording)
    }

    /// Get countdown as parsed Duration, or default if not set/invalid
    pub fn countdown_or_default(&self) -> Duration {
        self.countdown
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_countdown)
    }

    /// Get provider as parsed TranscriptProvider, or default if not set/invalid
    pub fn provider_or_default(&self) -> TranscriptProvider {
        self.provider
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// View the persisted device selections
    pub fn device_preferences(&self) -> DevicePreferences {
        DevicePreferences {
            camera_id: self.camera.clone(),
            microphone_id: self.microphone.clone(),
        }
    }

    /// Overwrite the persisted device selections
    pub fn set_device_preferences(&mut self, prefs: &DevicePreferences) {
        self.camera = prefs.camera_id.clone();
        self.microphone = prefs.microphone_id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.camera.is_none());
        assert!(config.microphone.is_none());
        assert_eq!(config.max_duration, Some("2m".to_string()));
        assert_eq!(config.countdown, Some("3s".to_string()));
        assert_eq!(config.provider, Some("whisper".to_string()));
        assert_eq!(config.notify, Some(false));
        assert!(config.api_base.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.camera.is_none());
        assert!(config.max_duration.is_none());
        assert!(config.provider.is_none());
        assert!(config.notify.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            camera: Some("cam-0".to_string()),
            max_duration: Some("1m".to_string()),
            provider: Some("whisper".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            camera: Some("cam-1".to_string()),
            max_duration: None, // Should not override
            provider: Some("deepgram".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.camera, Some("cam-1".to_string()));
        assert_eq!(merged.max_duration, Some("1m".to_string()));
        assert_eq!(merged.provider, Some("deepgram".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            microphone: Some("mic-0".to_string()),
            notify: Some(true),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.microphone, Some("mic-0".to_string()));
        assert_eq!(merged.notify, Some(true));
    }

    #[test]
    fn max_duration_or_default_parses() {
        let config = AppConfig {
            max_duration: Some("30s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 30);
    }

    #[test]
    fn max_duration_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            max_duration: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 120);
    }

    #[test]
    fn countdown_or_default() {
        assert_eq!(AppConfig::empty().countdown_or_default().as_secs(), 3);
    }

    #[test]
    fn provider_or_default_parses() {
        let config = AppConfig {
            provider: Some("deepgram".to_string()),
            ..Default::default()
        };
        assert_eq!(config.provider_or_default(), TranscriptProvider::Deepgram);
    }

    #[test]
    fn provider_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            provider: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.provider_or_default(), TranscriptProvider::Whisper);
    }

    #[test]
    fn device_preferences_round_trip() {
        let mut config = AppConfig::empty();
        let prefs = DevicePreferences {
            camera_id: Some("cam-1".to_string()),
            microphone_id: Some("mic-2".to_string()),
        };
        config.set_device_preferences(&prefs);
        assert_eq!(config.device_preferences(), prefs);
    }
}
