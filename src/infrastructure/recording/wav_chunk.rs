//! Chunked WAV recorder
//!
//! Encodes the microphone tap of a live stream into timesliced WAV
//! chunks. The first chunk is a streaming header, every later chunk is
//! raw PCM, so concatenating all chunks in order yields a playable
//! blob of unknown length.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::application::ports::{AudioTap, LiveStream, MediaRecorder, RecorderError};
use crate::domain::media::MediaMimeType;
use crate::domain::recording::{Duration, RecordingFormat};

use super::wav;

struct ActiveRecording {
    paused: Arc<AtomicBool>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Records the audio track of a live stream as chunked WAV
pub struct WavChunkRecorder {
    active: Mutex<Option<ActiveRecording>>,
}

impl WavChunkRecorder {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }
}

impl Default for WavChunkRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain the tap every timeslice and forward PCM chunks until stopped.
/// Paused slices are drained and discarded so the tap never grows
/// unbounded, and nothing recorded while paused leaks into the output.
async fn pump_chunks(
    tap: AudioTap,
    timeslice: Duration,
    paused: Arc<AtomicBool>,
    mut stop_rx: watch::Receiver<bool>,
    chunks: mpsc::Sender<Vec<u8>>,
) {
    let mut ticker = interval(timeslice.as_std());
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let samples = tap.drain();
                if paused.load(Ordering::SeqCst) || samples.is_empty() {
                    continue;
                }
                if chunks.send(wav::samples_to_bytes(&samples)).await.is_err() {
                    return;
                }
            }
            _ = stop_rx.changed() => {
                let samples = tap.drain();
                if !paused.load(Ordering::SeqCst) && !samples.is_empty() {
                    let _ = chunks.send(wav::samples_to_bytes(&samples)).await;
                }
                return;
            }
        }
    }
    // Dropping the sender closes the chunk channel
}

#[async_trait]
impl MediaRecorder for WavChunkRecorder {
    fn supports(&self, format: RecordingFormat) -> bool {
        format == RecordingFormat::PlatformDefault
    }

    fn default_mime(&self) -> MediaMimeType {
        MediaMimeType::Wav
    }

    async fn start(
        &self,
        stream: Arc<dyn LiveStream>,
        format: RecordingFormat,
        timeslice: Duration,
        chunks: mpsc::Sender<Vec<u8>>,
    ) -> Result<(), RecorderError> {
        if !self.supports(format) {
            return Err(RecorderError::UnsupportedFormat(
                format.requested_mime().to_string(),
            ));
        }
        if !stream.is_live() {
            return Err(RecorderError::StreamNotLive);
        }
        let tap = stream
            .audio_tap()
            .ok_or_else(|| RecorderError::StartFailed("stream has no audio track".to_string()))?;

        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(RecorderError::StartFailed(
                "recorder is already running".to_string(),
            ));
        }

        // Discard whatever accumulated before recording began
        tap.drain();

        let header = wav::streaming_header(tap.sample_rate, 1);
        chunks
            .send(header.to_vec())
            .await
            .map_err(|_| RecorderError::StartFailed("chunk channel closed".to_string()))?;

        let paused = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(pump_chunks(
            tap,
            timeslice,
            Arc::clone(&paused),
            stop_rx,
            chunks,
        ));

        *active = Some(ActiveRecording {
            paused,
            stop_tx,
            task,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), RecorderError> {
        let recording = self
            .active
            .lock()
            .await
            .take()
            .ok_or_else(|| RecorderError::Failed("recorder is not running".to_string()))?;

        let _ = recording.stop_tx.send(true);
        recording
            .task
            .await
            .map_err(|e| RecorderError::Failed(format!("chunk task failed: {}", e)))?;
        Ok(())
    }

    async fn pause(&self) -> Result<(), RecorderError> {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(recording) => {
                recording.paused.store(true, Ordering::SeqCst);
                Ok(())
            }
            None => Err(RecorderError::Failed(
                "recorder is not running".to_string(),
            )),
        }
    }

    async fn resume(&self) -> Result<(), RecorderError> {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(recording) => {
                recording.paused.store(false, Ordering::SeqCst);
                Ok(())
            }
            None => Err(RecorderError::Failed(
                "recorder is not running".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::Uuid;

    struct TapStream {
        id: Uuid,
        live: AtomicBool,
        tap: AudioTap,
    }

    impl TapStream {
        fn new(sample_rate: u32) -> Self {
            Self {
                id: Uuid::new_v4(),
                live: AtomicBool::new(true),
                tap: AudioTap::new(sample_rate),
            }
        }

        fn feed(&self, samples: &[i16]) {
            self.tap.samples.lock().unwrap().extend_from_slice(samples);
        }
    }

    impl LiveStream for TapStream {
        fn id(&self) -> Uuid {
            self.id
        }
        fn camera_id(&self) -> &str {
            "cam-0"
        }
        fn microphone_id(&self) -> Option<&str> {
            Some("mic-0")
        }
        fn is_live(&self) -> bool {
            self.live.load(Ordering::SeqCst)
        }
        fn stop(&self) {
            self.live.store(false, Ordering::SeqCst);
        }
        fn audio_tap(&self) -> Option<AudioTap> {
            Some(self.tap.clone())
        }
    }

    fn timeslice() -> Duration {
        Duration::from_secs(1)
    }

    #[tokio::test]
    async fn rejects_unsupported_formats() {
        let recorder = WavChunkRecorder::new();
        let stream = Arc::new(TapStream::new(44_100));
        let (tx, _rx) = mpsc::channel(16);

        let err = recorder
            .start(stream, RecordingFormat::Mp4H264, timeslice(), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn rejects_dead_streams() {
        let recorder = WavChunkRecorder::new();
        let stream = Arc::new(TapStream::new(44_100));
        stream.stop();
        let (tx, _rx) = mpsc::channel(16);

        let err = recorder
            .start(stream, RecordingFormat::PlatformDefault, timeslice(), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::StreamNotLive));
    }

    #[tokio::test(start_paused = true)]
    async fn first_chunk_is_streaming_header() {
        let recorder = WavChunkRecorder::new();
        let stream = Arc::new(TapStream::new(48_000));
        let (tx, mut rx) = mpsc::channel(16);

        recorder
            .start(
                Arc::clone(&stream) as Arc<dyn LiveStream>,
                RecordingFormat::PlatformDefault,
                timeslice(),
                tx,
            )
            .await
            .unwrap();

        let header = rx.recv().await.unwrap();
        assert_eq!(header.len(), wav::HEADER_LEN);
        let (rate, channels, _) = wav::parse_streaming(&header).unwrap();
        assert_eq!(rate, 48_000);
        assert_eq!(channels, 1);

        recorder.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_flushes_pending_samples_and_closes_channel() {
        let recorder = WavChunkRecorder::new();
        let stream = Arc::new(TapStream::new(44_100));
        let (tx, mut rx) = mpsc::channel(16);

        recorder
            .start(
                Arc::clone(&stream) as Arc<dyn LiveStream>,
                RecordingFormat::PlatformDefault,
                timeslice(),
                tx,
            )
            .await
            .unwrap();
        let _header = rx.recv().await.unwrap();

        stream.feed(&[10, 20, 30]);
        recorder.stop().await.unwrap();

        let chunk = rx.recv().await.unwrap();
        assert_eq!(chunk, wav::samples_to_bytes(&[10, 20, 30]));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn paused_slices_are_discarded() {
        let recorder = WavChunkRecorder::new();
        let stream = Arc::new(TapStream::new(44_100));
        let (tx, mut rx) = mpsc::channel(16);

        recorder
            .start(
                Arc::clone(&stream) as Arc<dyn LiveStream>,
                RecordingFormat::PlatformDefault,
                timeslice(),
                tx,
            )
            .await
            .unwrap();
        let _header = rx.recv().await.unwrap();

        recorder.pause().await.unwrap();
        stream.feed(&[1, 2, 3, 4]);
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        recorder.resume().await.unwrap();
        stream.feed(&[50, 60]);
        recorder.stop().await.unwrap();

        // Only the post-resume samples survive
        let chunk = rx.recv().await.unwrap();
        assert_eq!(chunk, wav::samples_to_bytes(&[50, 60]));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_start_fails() {
        let recorder = WavChunkRecorder::new();
        assert!(matches!(
            recorder.stop().await.unwrap_err(),
            RecorderError::Failed(_)
        ));
    }
}
