//! Main app runner for the record-and-analyze flow

use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::ConfigStore;
use crate::application::{
    AnalyzeCallbacks, AnalyzeInput, AnalyzePitchUseCase, DeviceInventory, PitchRecorder,
    RecorderEvent, RecorderPhase, RecordingEngine, StopReason, StreamAcquirer, SurfaceController,
};
use crate::application::ports::FormFactor;
use crate::domain::config::AppConfig;
use crate::domain::device::DeviceKind;
use crate::domain::media::{MediaData, MediaMimeType};
use crate::domain::recording::SystemClock;
use crate::infrastructure::{
    DocumentClient, HttpTranscriber, NativeCaptureBackend, NativeDeviceEnumerator,
    NotifyRustNotifier, TerminalSurface, UploadClient, WavAudioExtractor, WavChunkRecorder,
    XdgConfigStore,
};

use super::args::{AnalyzeOptions, RecordOptions};
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Record a pitch, then optionally run it through the analysis
/// pipeline
pub async fn run_pitch(
    record: RecordOptions,
    analyze: Option<AnalyzeOptions>,
) -> ExitCode {
    let mut presenter = Presenter::new();

    let recording = match run_record(&record, &mut presenter).await {
        Ok(Some(recording)) => recording,
        Ok(None) => {
            presenter.info("Recording cancelled");
            return ExitCode::from(EXIT_SUCCESS);
        }
        Err(e) => {
            presenter.stop_spinner();
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.success(&format!(
        "Recording complete ({})",
        recording.human_readable_size()
    ));

    if let Some(path) = &record.output {
        if let Err(e) = tokio::fs::write(path, recording.data()).await {
            presenter.error(&format!("Failed to save recording: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
        presenter.info(&format!("Saved to {}", path.display()));
    }

    match analyze {
        Some(options) => run_analyze(&recording, options, &mut presenter).await,
        None => ExitCode::from(EXIT_SUCCESS),
    }
}

/// Run the capture flow and return the finished recording.
/// `Ok(None)` means the user cancelled during the countdown.
async fn run_record(
    options: &RecordOptions,
    presenter: &mut Presenter,
) -> Result<Option<MediaData>, String> {
    // Resolve device choices, falling back to persisted selections
    let inventory = DeviceInventory::new(NativeDeviceEnumerator::new(), XdgConfigStore::new());
    let camera = match &options.camera {
        Some(id) => Some(id.clone()),
        None => inventory
            .restore_or_default(DeviceKind::Camera)
            .await
            .map_err(|e| e.to_string())?
            .map(|d| d.id),
    };
    let microphone = match &options.microphone {
        Some(id) => Some(id.clone()),
        None => inventory
            .restore_or_default(DeviceKind::Microphone)
            .await
            .map_err(|e| e.to_string())?
            .map(|d| d.id),
    };

    // Wire the recorder stack
    let form_factor = if options.compact {
        FormFactor::Compact
    } else {
        FormFactor::Standard
    };
    let acquirer = StreamAcquirer::new(Arc::new(NativeCaptureBackend::new()), form_factor);
    let clock = Arc::new(SystemClock::new());
    let engine = RecordingEngine::new(
        Arc::new(WavChunkRecorder::new()),
        clock.clone(),
        options.max_duration,
    );
    let surface = SurfaceController::new(Arc::new(TerminalSurface::new()));
    let recorder = PitchRecorder::new(
        acquirer,
        engine,
        surface,
        Arc::new(NotifyRustNotifier::new()),
        clock,
        options.countdown,
        options.notify,
    );

    // First Ctrl+C cancels the countdown or stops the take, a second
    // one aborts the process
    let signal_recorder = recorder.clone();
    tokio::spawn(async move {
        let mut interrupted = false;
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            if interrupted {
                std::process::exit(130);
            }
            interrupted = true;
            match signal_recorder.phase() {
                RecorderPhase::Countdown => signal_recorder.cancel_countdown(),
                RecorderPhase::Recording | RecorderPhase::Paused => {
                    let _ = signal_recorder.stop().await;
                }
                _ => std::process::exit(130),
            }
        }
    });

    // Print countdown ticks while start_recording runs
    let mut countdown_events = recorder.subscribe();
    let tick_printer = tokio::spawn(async move {
        while let Ok(event) = countdown_events.recv().await {
            match event {
                RecorderEvent::CountdownTick(remaining) => {
                    eprintln!("● Starting in {}...", remaining);
                }
                RecorderEvent::RecordingStarted => return,
                _ => {}
            }
        }
    });

    let mut events = recorder.subscribe();

    presenter.info("Opening camera and microphone...");
    recorder
        .prepare(camera, microphone)
        .await
        .map_err(|e| e.to_string())?;
    presenter.info("Preview ready. Press Ctrl+C to stop.");

    let started = recorder.start_recording().await.map_err(|e| e.to_string())?;
    tick_printer.abort();
    if !started {
        let _ = recorder.shutdown().await;
        return Ok(None);
    }

    presenter.show_recording_progress("Recording...");
    let total_ms = options.max_duration.as_millis();

    let reason = loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(RecorderEvent::RecordingStopped(reason)) => break reason,
                Ok(RecorderEvent::RecordingPaused) => presenter.update_spinner("Paused"),
                Ok(_) => {}
                Err(_) => break StopReason::Manual,
            },
            _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => {
                presenter.update_recording_progress(recorder.recorded_ms(), total_ms);
            }
        }
    };

    presenter.stop_spinner();
    if reason == StopReason::MaxDuration {
        presenter.warn("Maximum recording time reached");
    }

    let recording = recorder.last_recording();
    let _ = recorder.shutdown().await;

    recording
        .filter(|r| !r.data().is_empty())
        .map(Some)
        .ok_or_else(|| "No audio was captured".to_string())
}

/// Run a finished recording through upload, transcription and
/// document generation
pub async fn run_analyze(
    recording: &MediaData,
    options: AnalyzeOptions,
    presenter: &mut Presenter,
) -> ExitCode {
    let use_case = AnalyzePitchUseCase::new(
        UploadClient::new(&options.api_base),
        WavAudioExtractor::new(),
        HttpTranscriber::new(&options.api_base),
        DocumentClient::new(&options.api_base),
        NotifyRustNotifier::new(),
    );

    let input = AnalyzeInput {
        provider: options.provider,
        language: options.language.clone(),
        enable_notify: options.notify,
    };

    let callbacks = AnalyzeCallbacks {
        on_upload_start: Some(Box::new(|size: &str| {
            eprintln!("⠋ Uploading recording ({})...", size);
        })),
        on_upload_end: Some(Box::new(|file_id: &str| {
            eprintln!("✓ Uploaded (id: {})", file_id);
        })),
        on_transcribe_start: Some(Box::new(|size: &str| {
            eprintln!("⠋ Transcribing audio ({})...", size);
        })),
        on_transcribe_end: Some(Box::new(|_text: &str| {
            eprintln!("✓ Transcription complete");
        })),
        on_generate_start: Some(Box::new(|| {
            eprintln!("⠋ Generating MVP document...");
        })),
        on_generate_end: Some(Box::new(|| {
            eprintln!("✓ Document ready");
        })),
    };

    match use_case.execute(recording, input, callbacks).await {
        Ok(analysis) => {
            presenter.output(&analysis.document.content);
            if analysis.document.usage.total_tokens > 0 {
                presenter.info(&format!(
                    "Tokens used: {}",
                    analysis.document.usage.total_tokens
                ));
            }
            if analysis.used_server_audio {
                presenter.info("Audio was extracted server-side");
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Read a recording from disk for the analyze subcommand
pub async fn load_recording(path: &std::path::Path) -> Result<MediaData, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("mp4") => MediaMimeType::Mp4,
        Some("webm") => MediaMimeType::Webm,
        _ => MediaMimeType::Wav,
    };

    Ok(MediaData::new(bytes, mime))
}

/// List devices, or persist a device selection
pub async fn run_devices(
    action: Option<super::args::DeviceAction>,
    presenter: &Presenter,
) -> ExitCode {
    let inventory = DeviceInventory::new(NativeDeviceEnumerator::new(), XdgConfigStore::new());

    match action {
        None | Some(super::args::DeviceAction::List) => {
            let listing = match inventory.list_all().await {
                Ok(listing) => listing,
                Err(e) => {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
            };

            if listing.permission_denied {
                presenter.warn("Some devices are hidden until camera/microphone access is granted");
            }

            presenter.heading("Cameras");
            let cameras: Vec<_> = listing
                .devices
                .iter()
                .filter(|d| d.kind == DeviceKind::Camera)
                .collect();
            if cameras.is_empty() {
                presenter.output("  (none found)");
            }
            for device in cameras {
                presenter.key_value(&format!("  {}", device.id), &device.display_label());
            }

            presenter.heading("Microphones");
            let microphones: Vec<_> = listing
                .devices
                .iter()
                .filter(|d| d.kind == DeviceKind::Microphone)
                .collect();
            if microphones.is_empty() {
                presenter.output("  (none found)");
            }
            for device in microphones {
                presenter.key_value(&format!("  {}", device.id), &device.display_label());
            }

            ExitCode::from(EXIT_SUCCESS)
        }
        Some(super::args::DeviceAction::Select { kind, id }) => {
            let kind = DeviceKind::from(kind);
            match inventory.select(kind, &id).await {
                Ok(()) => {
                    presenter.success(&format!("{} set to {}", kind, id));
                    ExitCode::from(EXIT_SUCCESS)
                }
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
    }
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli (env vars arrive through clap)
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
