//! Pitch recorder orchestration use case

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

use crate::domain::device::DeviceKind;
use crate::domain::error::InvalidPhaseTransition;
use crate::domain::media::MediaData;
use crate::domain::recording::{Clock, Duration, RecordingTimer};

use super::acquirer::StreamAcquirer;
use super::engine::{EngineError, EngineEvent, RecordingEngine, StopReason};
use super::ports::{CaptureError, LiveStream, NotificationIcon, Notifier, SurfaceError};
use super::surface::SurfaceController;

/// Errors from the orchestrator
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Phase(#[from] InvalidPhaseTransition),

    #[error("No live camera stream. Prepare the camera first")]
    NoStream,

    #[error("Camera setup failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Recording failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Display failed: {0}")]
    Surface(#[from] SurfaceError),
}

/// User-visible recorder phases, strictly transitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Idle,
    Countdown,
    Recording,
    Paused,
    Playback,
}

impl RecorderPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Countdown => "countdown",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Playback => "playback",
        }
    }
}

impl fmt::Display for RecorderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orchestrator lifecycle events
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    CountdownTick(u64),
    RecordingStarted,
    RecordingPaused,
    RecordingResumed,
    RecordingStopped(StopReason),
    PlaybackReady(String),
}

struct RecorderInner {
    acquirer: StreamAcquirer,
    engine: RecordingEngine,
    surface: SurfaceController,
    notifier: Arc<dyn Notifier>,
    timer: StdMutex<RecordingTimer>,
    phase: StdMutex<RecorderPhase>,
    last_devices: StdMutex<(Option<String>, Option<String>)>,
    countdown: Duration,
    countdown_cancel: AtomicBool,
    notify: bool,
    events: broadcast::Sender<RecorderEvent>,
    // Serializes operations; phase checks and their side effects must
    // not interleave with a concurrent auto-stop
    ops: Mutex<()>,
}

/// Drives the full record-a-pitch lifecycle: camera preview, countdown,
/// recording with pause/resume, and review playback.
///
/// Unlike the engine underneath it, operations in the wrong phase are
/// errors here, not no-ops, so callers find out they acted on stale
/// state.
#[derive(Clone)]
pub struct PitchRecorder {
    inner: Arc<RecorderInner>,
}

impl PitchRecorder {
    pub fn new(
        acquirer: StreamAcquirer,
        engine: RecordingEngine,
        surface: SurfaceController,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        countdown: Duration,
        notify: bool,
    ) -> Self {
        let (events, _) = broadcast::channel(32);
        let timer = RecordingTimer::new(engine.max_duration(), clock);
        let recorder = Self {
            inner: Arc::new(RecorderInner {
                acquirer,
                engine,
                surface,
                notifier,
                timer: StdMutex::new(timer),
                phase: StdMutex::new(RecorderPhase::Idle),
                last_devices: StdMutex::new((None, None)),
                countdown,
                countdown_cancel: AtomicBool::new(false),
                notify,
                events,
                ops: Mutex::new(()),
            }),
        };
        recorder.spawn_engine_listener();
        recorder
    }

    /// Subscribe to recorder lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.inner.events.subscribe()
    }

    /// Current recorder phase
    pub fn phase(&self) -> RecorderPhase {
        *self.lock(&self.inner.phase)
    }

    /// Seconds remaining before the maximum duration stops the take
    pub fn time_left_secs(&self) -> u64 {
        self.lock(&self.inner.timer).time_left_secs()
    }

    /// Pause-adjusted recorded time so far
    pub fn recorded_ms(&self) -> u64 {
        self.lock(&self.inner.timer).recorded_ms()
    }

    /// The finished recording available for review, if any
    pub fn last_recording(&self) -> Option<MediaData> {
        self.inner.engine.last_recording()
    }

    /// The playback URL of the recording under review, if any
    pub fn playback_url(&self) -> Option<String> {
        self.inner.surface.playback_url()
    }

    /// Acquire the camera/microphone and show the live preview.
    /// Valid from idle.
    pub async fn prepare(
        &self,
        camera_id: Option<String>,
        microphone_id: Option<String>,
    ) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        self.require_phase(&[RecorderPhase::Idle], "prepare the camera")?;

        *self.lock(&self.inner.last_devices) = (camera_id, microphone_id);

        let stream = self.acquire_preview().await?;
        self.inner.surface.enter_stream(stream).await?;
        Ok(())
    }

    /// Run the countdown and start recording. Valid from idle with a
    /// prepared stream. Returns false when the countdown was cancelled.
    pub async fn start_recording(&self) -> Result<bool, OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        self.require_phase(&[RecorderPhase::Idle], "start recording")?;
        if self.inner.acquirer.current_stream().await.is_none() {
            return Err(OrchestratorError::NoStream);
        }

        self.inner.countdown_cancel.store(false, Ordering::SeqCst);
        self.set_phase(RecorderPhase::Countdown);

        for remaining in (1..=self.inner.countdown.as_secs()).rev() {
            let _ = self
                .inner
                .events
                .send(RecorderEvent::CountdownTick(remaining));
            tokio::time::sleep(StdDuration::from_secs(1)).await;
            if self.inner.countdown_cancel.load(Ordering::SeqCst) {
                self.set_phase(RecorderPhase::Idle);
                return Ok(false);
            }
        }

        let stream = self
            .inner
            .acquirer
            .current_stream()
            .await
            .ok_or(OrchestratorError::NoStream)?;
        self.inner.engine.start(stream).await?;
        self.lock(&self.inner.timer).start();
        self.set_phase(RecorderPhase::Recording);
        let _ = self.inner.events.send(RecorderEvent::RecordingStarted);
        Ok(true)
    }

    /// Abort a running countdown before the recording starts
    pub fn cancel_countdown(&self) {
        self.inner.countdown_cancel.store(true, Ordering::SeqCst);
    }

    /// Pause the take. Valid while recording.
    pub async fn pause(&self) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        self.require_phase(&[RecorderPhase::Recording], "pause")?;

        self.inner.engine.pause().await?;
        self.lock(&self.inner.timer).pause();
        self.set_phase(RecorderPhase::Paused);
        let _ = self.inner.events.send(RecorderEvent::RecordingPaused);
        Ok(())
    }

    /// Resume the take. Valid while paused.
    pub async fn resume(&self) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        self.require_phase(&[RecorderPhase::Paused], "resume")?;

        self.inner.engine.resume().await?;
        self.lock(&self.inner.timer).resume();
        self.set_phase(RecorderPhase::Recording);
        let _ = self.inner.events.send(RecorderEvent::RecordingResumed);
        Ok(())
    }

    /// Stop the take and move to review playback. Valid while
    /// recording or paused.
    pub async fn stop(&self) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        self.require_phase(
            &[RecorderPhase::Recording, RecorderPhase::Paused],
            "stop recording",
        )?;

        self.inner.engine.stop().await?;
        self.finish_recording(StopReason::Manual).await
    }

    /// Discard the reviewed take and return to a fresh live preview.
    /// Valid from playback or idle.
    pub async fn new_recording(&self) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        self.require_phase(
            &[RecorderPhase::Playback, RecorderPhase::Idle],
            "start a new recording",
        )?;

        self.inner.engine.reset().await?;
        self.lock(&self.inner.timer).reset();

        let stream = self.acquire_preview().await?;
        self.inner.surface.enter_stream(stream).await?;
        self.set_phase(RecorderPhase::Idle);
        Ok(())
    }

    /// Change the active camera or microphone. Stops and finalizes a
    /// take in flight, then re-attaches the live preview on the new
    /// device; refreshes the preview when idle. The finished take
    /// stays available through `last_recording`.
    pub async fn switch_device(
        &self,
        kind: DeviceKind,
        id: String,
    ) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;

        {
            let mut devices = self.lock(&self.inner.last_devices);
            match kind {
                DeviceKind::Camera => devices.0 = Some(id),
                DeviceKind::Microphone => devices.1 = Some(id),
            }
        }

        match self.phase() {
            RecorderPhase::Recording | RecorderPhase::Paused => {
                self.inner.engine.stop().await?;
                let _ = self
                    .inner
                    .events
                    .send(RecorderEvent::RecordingStopped(StopReason::Manual));
                self.lock(&self.inner.timer).reset();

                // Acquiring tears down the old stream before the new
                // open, so the hardware is never held twice
                let stream = self.acquire_preview().await?;
                self.inner.surface.enter_stream(stream).await?;
                self.set_phase(RecorderPhase::Idle);
            }
            RecorderPhase::Idle => {
                let stream = self.acquire_preview().await?;
                self.inner.surface.enter_stream(stream).await?;
            }
            // Takes effect on the next preview
            RecorderPhase::Countdown | RecorderPhase::Playback => {}
        }
        Ok(())
    }

    /// Play the recording under review
    pub async fn play(&self) -> Result<(), OrchestratorError> {
        self.require_phase(&[RecorderPhase::Playback], "play")?;
        self.inner.surface.play().await?;
        Ok(())
    }

    /// Pause the recording under review
    pub async fn pause_playback(&self) -> Result<(), OrchestratorError> {
        self.require_phase(&[RecorderPhase::Playback], "pause playback")?;
        self.inner.surface.pause_playback().await?;
        Ok(())
    }

    /// Stop the preview and release the camera without recording
    pub async fn shutdown(&self) -> Result<(), OrchestratorError> {
        let _op = self.inner.ops.lock().await;
        if matches!(
            self.phase(),
            RecorderPhase::Recording | RecorderPhase::Paused
        ) {
            self.inner.engine.stop().await?;
            self.finish_recording(StopReason::Manual).await?;
        }
        self.inner.surface.enter_idle().await?;
        self.inner.acquirer.release().await;
        Ok(())
    }

    // Engine stopped; release the camera and put the finished take on
    // the surface. Caller holds the ops lock.
    async fn finish_recording(&self, reason: StopReason) -> Result<(), OrchestratorError> {
        let _ = self
            .inner
            .events
            .send(RecorderEvent::RecordingStopped(reason));

        // Camera light off before review
        self.inner.acquirer.release().await;

        match self.inner.engine.last_recording() {
            Some(blob) => {
                let url = self.inner.surface.enter_playback(blob).await?;
                self.set_phase(RecorderPhase::Playback);
                let _ = self.inner.events.send(RecorderEvent::PlaybackReady(url));
            }
            None => {
                self.inner.surface.enter_idle().await?;
                self.set_phase(RecorderPhase::Idle);
            }
        }
        Ok(())
    }

    // Acquire a live stream for the stored device choice, mapping
    // capture failures onto user-facing notices. A stale persisted id
    // gets one retry against the platform defaults; the stored choice
    // is cleared so later acquisitions go straight to the defaults.
    async fn acquire_preview(&self) -> Result<Arc<dyn LiveStream>, OrchestratorError> {
        let (camera_id, microphone_id) = self.lock(&self.inner.last_devices).clone();
        let had_ids = camera_id.is_some() || microphone_id.is_some();

        let result = match self.inner.acquirer.acquire(camera_id, microphone_id).await {
            Err(CaptureError::NotFound(device)) if had_ids => {
                self.notice(
                    &format!(
                        "{} is no longer connected. Using the default camera and microphone.",
                        device
                    ),
                    NotificationIcon::Warning,
                )
                .await;
                *self.lock(&self.inner.last_devices) = (None, None);
                self.inner.acquirer.acquire(None, None).await
            }
            other => other,
        };

        match result {
            Ok(stream) => Ok(stream),
            Err(CaptureError::Timeout) => {
                self.notice(
                    "Camera setup is taking too long. Close other apps using the camera and try again.",
                    NotificationIcon::Warning,
                )
                .await;
                Err(CaptureError::Timeout.into())
            }
            Err(CaptureError::PermissionDenied(what)) => {
                self.notice(
                    "Camera and microphone access is blocked. Allow access in your system privacy settings and try again.",
                    NotificationIcon::Error,
                )
                .await;
                Err(CaptureError::PermissionDenied(what).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn spawn_engine_listener(&self) {
        let mut rx = self.inner.engine.subscribe();
        let recorder = self.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(EngineEvent::Stopped(StopReason::MaxDuration)) => {
                        recorder.handle_auto_stop().await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    async fn handle_auto_stop(&self) {
        let _op = self.inner.ops.lock().await;
        // A manual stop that raced the deadline has already finished
        // the take
        if !matches!(
            self.phase(),
            RecorderPhase::Recording | RecorderPhase::Paused
        ) {
            return;
        }
        if self
            .finish_recording(StopReason::MaxDuration)
            .await
            .is_ok()
        {
            self.notice(
                "Maximum recording time reached. Your pitch is ready for review.",
                NotificationIcon::Info,
            )
            .await;
        }
    }

    async fn notice(&self, message: &str, icon: NotificationIcon) {
        if self.inner.notify {
            let _ = self
                .inner
                .notifier
                .notify("PitchCast", message, icon)
                .await;
        }
    }

    fn require_phase(
        &self,
        allowed: &[RecorderPhase],
        action: &str,
    ) -> Result<(), InvalidPhaseTransition> {
        let phase = self.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(InvalidPhaseTransition {
                phase: phase.to_string(),
                action: action.to_string(),
            })
        }
    }

    fn set_phase(&self, phase: RecorderPhase) {
        *self.lock(&self.inner.phase) = phase;
    }

    fn lock<'a, T>(&self, mutex: &'a StdMutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(RecorderPhase::Idle.to_string(), "idle");
        assert_eq!(RecorderPhase::Countdown.to_string(), "countdown");
        assert_eq!(RecorderPhase::Playback.to_string(), "playback");
    }
}
