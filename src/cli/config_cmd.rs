//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::analysis::TranscriptProvider;
use crate::domain::error::PreferenceError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), PreferenceError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), PreferenceError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), PreferenceError> {
    if !is_valid_config_key(key) {
        return Err(PreferenceError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    validate_config_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "camera" => config.camera = Some(value.to_string()),
        "microphone" => config.microphone = Some(value.to_string()),
        "max_duration" => config.max_duration = Some(value.to_string()),
        "countdown" => config.countdown = Some(value.to_string()),
        "provider" => config.provider = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "api_base" => config.api_base = Some(value.to_string()),
        "notify" => {
            config.notify = Some(parse_bool(value).map_err(|_| PreferenceError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?)
        }
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), PreferenceError> {
    if !is_valid_config_key(key) {
        return Err(PreferenceError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "camera" => config.camera,
        "microphone" => config.microphone,
        "max_duration" => config.max_duration,
        "countdown" => config.countdown,
        "provider" => config.provider,
        "language" => config.language,
        "api_base" => config.api_base,
        "notify" => config.notify.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), PreferenceError> {
    let config = store.load().await?;

    presenter.key_value("camera", config.camera.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "microphone",
        config.microphone.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "max_duration",
        config.max_duration.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "countdown",
        config.countdown.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "provider",
        config.provider.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "language",
        config.language.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "api_base",
        config.api_base.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "notify",
        &config
            .notify
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), PreferenceError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), PreferenceError> {
    match key {
        "max_duration" | "countdown" => {
            value
                .parse::<Duration>()
                .map_err(|e| PreferenceError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "provider" => {
            value
                .parse::<TranscriptProvider>()
                .map_err(|e| PreferenceError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "notify" => {
            parse_bool(value).map_err(|_| PreferenceError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?;
        }
        "api_base" => {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(PreferenceError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be an http(s) URL".to_string(),
                });
            }
        }
        _ => {} // device ids and language accept any string
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn validate_duration_valid() {
        assert!(validate_config_value("max_duration", "90s").is_ok());
        assert!(validate_config_value("countdown", "3s").is_ok());
        assert!(validate_config_value("max_duration", "2m30s").is_ok());
    }

    #[test]
    fn validate_duration_invalid() {
        assert!(validate_config_value("max_duration", "invalid").is_err());
    }

    #[test]
    fn validate_provider_valid() {
        assert!(validate_config_value("provider", "whisper").is_ok());
        assert!(validate_config_value("provider", "deepgram").is_ok());
    }

    #[test]
    fn validate_provider_invalid() {
        assert!(validate_config_value("provider", "gemini").is_err());
    }

    #[test]
    fn validate_api_base() {
        assert!(validate_config_value("api_base", "https://api.example.com").is_ok());
        assert!(validate_config_value("api_base", "localhost:3000").is_err());
    }
}
