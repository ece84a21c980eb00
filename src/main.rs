//! PitchCast CLI entry point

use std::process::ExitCode;

use clap::Parser;

use pitchcast::cli::{
    app::{load_merged_config, load_recording, run_analyze, run_devices, run_pitch},
    app::{EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{AnalyzeOptions, Cli, Commands, RecordOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use pitchcast::domain::config::AppConfig;
use pitchcast::domain::recording::Duration;
use pitchcast::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Devices { action }) => {
            return run_devices(action, &presenter).await;
        }
        Some(Commands::Analyze { ref file }) => {
            let config = load_merged_config(cli_overrides(&cli)).await;
            let options = match analyze_options(&config, &presenter) {
                Some(options) => options,
                None => return ExitCode::from(EXIT_USAGE_ERROR),
            };
            let recording = match load_recording(&file).await {
                Ok(recording) => recording,
                Err(e) => {
                    presenter.error(&e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };
            let mut presenter = presenter;
            return run_analyze(&recording, options, &mut presenter).await;
        }
        None => {}
    }

    // Default flow: record, then analyze
    let config = load_merged_config(cli_overrides(&cli)).await;

    let max_duration = match parse_duration(
        config.max_duration.as_deref(),
        Duration::default_max_recording(),
        &presenter,
    ) {
        Some(d) => d,
        None => return ExitCode::from(EXIT_USAGE_ERROR),
    };
    let countdown = match parse_duration(
        config.countdown.as_deref(),
        Duration::default_countdown(),
        &presenter,
    ) {
        Some(d) => d,
        None => return ExitCode::from(EXIT_USAGE_ERROR),
    };

    let record = RecordOptions {
        camera: config.camera.clone(),
        microphone: config.microphone.clone(),
        max_duration,
        countdown,
        compact: cli.compact,
        notify: config.notify_or_default(),
        output: cli.output.clone(),
    };

    let analyze = if cli.no_analyze {
        None
    } else {
        match analyze_options(&config, &presenter) {
            Some(options) => Some(options),
            None => return ExitCode::from(EXIT_USAGE_ERROR),
        }
    };

    run_pitch(record, analyze).await
}

/// Build the config overlay from CLI arguments
fn cli_overrides(cli: &Cli) -> AppConfig {
    AppConfig {
        camera: cli.camera.clone(),
        microphone: cli.microphone.clone(),
        max_duration: cli.max_duration.clone(),
        countdown: cli.countdown.clone(),
        provider: cli
            .provider
            .map(|p| pitchcast::domain::analysis::TranscriptProvider::from(p).to_string()),
        language: cli.language.clone(),
        api_base: cli.api_base.clone(),
        notify: if cli.notify { Some(true) } else { None },
    }
}

fn parse_duration(
    value: Option<&str>,
    fallback: Duration,
    presenter: &Presenter,
) -> Option<Duration> {
    match value {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => Some(d),
            Err(e) => {
                presenter.error(&format!("Invalid duration: {}", e));
                None
            }
        },
        None => Some(fallback),
    }
}

/// Resolve pipeline options from the merged config
fn analyze_options(config: &AppConfig, presenter: &Presenter) -> Option<AnalyzeOptions> {
    let api_base = match config.api_base.clone() {
        Some(url) => url,
        None => {
            presenter.error(
                "Missing API base URL. Set PITCHCAST_API_BASE or run 'pitchcast config set api_base <url>'",
            );
            return None;
        }
    };

    Some(AnalyzeOptions {
        provider: config.provider_or_default(),
        language: config.language.clone(),
        api_base,
        notify: config.notify_or_default(),
    })
}
