//! Recording engine use case

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::domain::media::{MediaData, MediaMimeType};
use crate::domain::recording::{
    negotiate_format, Clock, Duration, RecordingSession, SessionPhase,
};

use super::ports::{LiveStream, MediaRecorder, RecorderError};

/// How often the recorder flushes an encoded chunk
pub const DEFAULT_TIMESLICE: Duration = Duration::from_secs(1);

/// Errors from the recording engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No supported recording format")]
    NoSupportedFormat,

    #[error("Recorder failed: {0}")]
    Recorder(#[from] RecorderError),
}

/// Why a recording ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Manual,
    MaxDuration,
}

/// Engine lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Started,
    Paused,
    Resumed,
    Stopped(StopReason),
}

struct EngineInner {
    recorder: Arc<dyn MediaRecorder>,
    clock: Arc<dyn Clock>,
    max_duration: Duration,
    timeslice: Duration,
    session: StdMutex<RecordingSession>,
    mime: StdMutex<Option<MediaMimeType>>,
    last_recording: StdMutex<Option<MediaData>>,
    drain: StdMutex<Option<JoinHandle<()>>>,
    deadline_cancel: StdMutex<Option<watch::Sender<bool>>>,
    events: broadcast::Sender<EngineEvent>,
    // Serializes start/stop/pause/resume so a racing auto-stop and
    // manual stop cannot interleave
    ops: Mutex<()>,
}

/// Drives one recording at a time over the platform recorder.
///
/// Transitions that do not match the current phase are silent no-ops
/// reported through the `bool` return. Exactly one `Stopped` event is
/// emitted per recording, whether the user stopped it or the maximum
/// duration did.
#[derive(Clone)]
pub struct RecordingEngine {
    inner: Arc<EngineInner>,
}

impl RecordingEngine {
    pub fn new(
        recorder: Arc<dyn MediaRecorder>,
        clock: Arc<dyn Clock>,
        max_duration: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(EngineInner {
                recorder,
                clock,
                max_duration,
                timeslice: DEFAULT_TIMESLICE,
                session: StdMutex::new(RecordingSession::new()),
                mime: StdMutex::new(None),
                last_recording: StdMutex::new(None),
                drain: StdMutex::new(None),
                deadline_cancel: StdMutex::new(None),
                events,
                ops: Mutex::new(()),
            }),
        }
    }

    /// Subscribe to engine lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    /// Current engine phase
    pub fn phase(&self) -> SessionPhase {
        self.session().phase()
    }

    /// Pause-adjusted recorded time so far
    pub fn recorded_ms(&self) -> u64 {
        self.session().recorded_ms(self.inner.clock.now_ms())
    }

    /// The configured maximum recording duration
    pub fn max_duration(&self) -> Duration {
        self.inner.max_duration
    }

    /// The finalized blob of the last completed recording
    pub fn last_recording(&self) -> Option<MediaData> {
        self.inner
            .last_recording
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Start recording the stream. No-op while a recording is active.
    pub async fn start(&self, stream: Arc<dyn LiveStream>) -> Result<bool, EngineError> {
        let _op = self.inner.ops.lock().await;

        if self.session().is_active() {
            return Ok(false);
        }

        let format = negotiate_format(|f| self.inner.recorder.supports(f))
            .ok_or(EngineError::NoSupportedFormat)?;
        let mime = format
            .container_mime()
            .unwrap_or_else(|| self.inner.recorder.default_mime());

        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(32);
        self.inner
            .recorder
            .start(stream, format, self.inner.timeslice, tx)
            .await?;

        {
            let mut session = self.session();
            session.reset();
            session.begin(self.inner.clock.now_ms());
        }
        *self.lock(&self.inner.mime) = Some(mime);
        *self.lock(&self.inner.last_recording) = None;

        let inner = Arc::clone(&self.inner);
        let drain = tokio::spawn(async move {
            while let Some(chunk) = rx.recv().await {
                inner
                    .session
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push_chunk(chunk);
            }
        });
        *self.lock(&self.inner.drain) = Some(drain);

        self.arm_deadline(self.inner.max_duration.as_std());

        let _ = self.inner.events.send(EngineEvent::Started);
        Ok(true)
    }

    /// Stop the recording and finalize the blob. No-op when idle.
    pub async fn stop(&self) -> Result<bool, EngineError> {
        self.stop_with_reason(StopReason::Manual).await
    }

    /// Pause the recording. No-op unless recording.
    pub async fn pause(&self) -> Result<bool, EngineError> {
        let _op = self.inner.ops.lock().await;

        if self.session().phase() != SessionPhase::Recording {
            return Ok(false);
        }

        self.inner.recorder.pause().await?;
        self.session().pause(self.inner.clock.now_ms());
        self.disarm_deadline();

        let _ = self.inner.events.send(EngineEvent::Paused);
        Ok(true)
    }

    /// Resume the recording. No-op unless paused.
    pub async fn resume(&self) -> Result<bool, EngineError> {
        let _op = self.inner.ops.lock().await;

        if self.session().phase() != SessionPhase::Paused {
            return Ok(false);
        }

        self.inner.recorder.resume().await?;
        self.session().resume(self.inner.clock.now_ms());

        // The deadline covers recorded time, not wall-clock time, so
        // paused time pushes it out
        let remaining = self
            .inner
            .max_duration
            .as_millis()
            .saturating_sub(self.recorded_ms());
        self.arm_deadline(StdDuration::from_millis(remaining));

        let _ = self.inner.events.send(EngineEvent::Resumed);
        Ok(true)
    }

    /// Discard the session and any finalized blob, returning to idle
    pub async fn reset(&self) -> Result<(), EngineError> {
        let _op = self.inner.ops.lock().await;

        self.disarm_deadline();
        if self.session().is_active() {
            let _ = self.inner.recorder.stop().await;
        }
        if let Some(drain) = self.lock(&self.inner.drain).take() {
            drain.abort();
        }
        self.session().reset();
        *self.lock(&self.inner.mime) = None;
        *self.lock(&self.inner.last_recording) = None;
        Ok(())
    }

    pub(crate) async fn stop_with_reason(&self, reason: StopReason) -> Result<bool, EngineError> {
        let _op = self.inner.ops.lock().await;

        if !self.session().is_active() {
            return Ok(false);
        }

        self.disarm_deadline();
        self.inner.recorder.stop().await?;

        // The recorder dropped its chunk sender; wait for the drain
        // task to land the final chunk before assembling
        let drain = self.lock(&self.inner.drain).take();
        if let Some(drain) = drain {
            let _ = drain.await;
        }

        let mime = self
            .lock(&self.inner.mime)
            .take()
            .unwrap_or_else(|| self.inner.recorder.default_mime());
        {
            let mut session = self.session();
            session.finish(self.inner.clock.now_ms());
            *self.lock(&self.inner.last_recording) = session.assemble(mime);
        }

        let _ = self.inner.events.send(EngineEvent::Stopped(reason));
        Ok(true)
    }

    fn arm_deadline(&self, remaining: StdDuration) {
        let (tx, mut rx) = watch::channel(false);
        *self.lock(&self.inner.deadline_cancel) = Some(tx);

        let engine = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(remaining) => {
                    let _ = engine.stop_with_reason(StopReason::MaxDuration).await;
                }
                _ = rx.changed() => {}
            }
        });
    }

    fn disarm_deadline(&self) {
        if let Some(cancel) = self.lock(&self.inner.deadline_cancel).take() {
            let _ = cancel.send(true);
        }
    }

    fn session(&self) -> std::sync::MutexGuard<'_, RecordingSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn lock<'a, T>(&self, mutex: &'a StdMutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }
}
