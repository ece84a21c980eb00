//! Headless video surface for the CLI
//!
//! The terminal cannot render video, so this surface keeps the same
//! attach/detach bookkeeping a real renderer would and tracks playback
//! position against the wall clock. The orchestration layer sequences
//! on attach results exactly as it would with a visible surface.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;

use crate::application::ports::{LiveStream, SurfaceError, VideoSurface};

enum Source {
    None,
    Stream { camera_id: String },
    Playback { url: String },
}

struct SurfaceState {
    source: Source,
    playing: bool,
    play_started: Option<Instant>,
    played_secs: f64,
}

pub struct TerminalSurface {
    state: Mutex<SurfaceState>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                source: Source::None,
                playing: false,
                play_started: None,
                played_secs: 0.0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The camera id of the attached stream, if one is attached
    pub fn attached_camera(&self) -> Option<String> {
        match &self.lock().source {
            Source::Stream { camera_id } => Some(camera_id.clone()),
            _ => None,
        }
    }

    /// The URL of the attached recording, if one is attached
    pub fn attached_url(&self) -> Option<String> {
        match &self.lock().source {
            Source::Playback { url } => Some(url.clone()),
            _ => None,
        }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSurface for TerminalSurface {
    async fn attach_stream(&self, stream: Arc<dyn LiveStream>) -> Result<(), SurfaceError> {
        if !stream.is_live() {
            return Err(SurfaceError::StreamNotLive);
        }
        let mut state = self.lock();
        state.source = Source::Stream {
            camera_id: stream.camera_id().to_string(),
        };
        state.playing = false;
        state.play_started = None;
        state.played_secs = 0.0;
        Ok(())
    }

    async fn attach_playback(&self, url: &str) -> Result<(), SurfaceError> {
        if url.is_empty() {
            return Err(SurfaceError::LoadFailed("empty media URL".to_string()));
        }
        let mut state = self.lock();
        state.source = Source::Playback {
            url: url.to_string(),
        };
        state.playing = false;
        state.play_started = None;
        state.played_secs = 0.0;
        Ok(())
    }

    async fn detach(&self) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        state.source = Source::None;
        state.playing = false;
        state.play_started = None;
        state.played_secs = 0.0;
        Ok(())
    }

    async fn play(&self) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        match state.source {
            Source::Playback { .. } => {
                if !state.playing {
                    state.playing = true;
                    state.play_started = Some(Instant::now());
                }
                Ok(())
            }
            _ => Err(SurfaceError::PlaybackFailed(
                "no recording attached".to_string(),
            )),
        }
    }

    async fn pause_playback(&self) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        match state.source {
            Source::Playback { .. } => {
                if state.playing {
                    if let Some(started) = state.play_started.take() {
                        state.played_secs += started.elapsed().as_secs_f64();
                    }
                    state.playing = false;
                }
                Ok(())
            }
            _ => Err(SurfaceError::PlaybackFailed(
                "no recording attached".to_string(),
            )),
        }
    }

    async fn position_secs(&self) -> f64 {
        let state = self.lock();
        let running = state
            .play_started
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        state.played_secs + running
    }

    fn has_source(&self) -> bool {
        !matches!(self.lock().source, Source::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};

    use uuid::Uuid;

    use crate::application::ports::AudioTap;

    struct StubStream {
        id: Uuid,
        live: AtomicBool,
    }

    impl StubStream {
        fn new(live: bool) -> Self {
            Self {
                id: Uuid::new_v4(),
                live: AtomicBool::new(live),
            }
        }
    }

    impl LiveStream for StubStream {
        fn id(&self) -> Uuid {
            self.id
        }
        fn camera_id(&self) -> &str {
            "cam-7"
        }
        fn microphone_id(&self) -> Option<&str> {
            None
        }
        fn is_live(&self) -> bool {
            self.live.load(Ordering::SeqCst)
        }
        fn stop(&self) {
            self.live.store(false, Ordering::SeqCst);
        }
        fn audio_tap(&self) -> Option<AudioTap> {
            None
        }
    }

    #[tokio::test]
    async fn attach_stream_requires_live_tracks() {
        let surface = TerminalSurface::new();
        let dead = Arc::new(StubStream::new(false));

        let err = surface.attach_stream(dead).await.unwrap_err();
        assert!(matches!(err, SurfaceError::StreamNotLive));
        assert!(!surface.has_source());
    }

    #[tokio::test]
    async fn attach_stream_records_camera() {
        let surface = TerminalSurface::new();
        surface
            .attach_stream(Arc::new(StubStream::new(true)))
            .await
            .unwrap();

        assert!(surface.has_source());
        assert_eq!(surface.attached_camera().as_deref(), Some("cam-7"));
    }

    #[tokio::test]
    async fn play_requires_playback_source() {
        let surface = TerminalSurface::new();
        surface
            .attach_stream(Arc::new(StubStream::new(true)))
            .await
            .unwrap();

        assert!(matches!(
            surface.play().await.unwrap_err(),
            SurfaceError::PlaybackFailed(_)
        ));
    }

    #[tokio::test]
    async fn playback_lifecycle() {
        let surface = TerminalSurface::new();
        surface.attach_playback("blob:abc").await.unwrap();
        assert_eq!(surface.attached_url().as_deref(), Some("blob:abc"));

        surface.play().await.unwrap();
        surface.pause_playback().await.unwrap();
        let position = surface.position_secs().await;
        assert!(position >= 0.0);

        surface.detach().await.unwrap();
        assert!(!surface.has_source());
    }

    #[tokio::test]
    async fn attach_playback_rejects_empty_url() {
        let surface = TerminalSurface::new();
        assert!(matches!(
            surface.attach_playback("").await.unwrap_err(),
            SurfaceError::LoadFailed(_)
        ));
    }
}
