//! Video surface controller use case

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::media::MediaData;

use super::ports::{LiveStream, SurfaceError, VideoSurface};

/// Mints local playback URLs for in-memory media and tracks their
/// lifetime. Each minted URL is revoked exactly once; a second revoke
/// is a no-op.
#[derive(Default)]
pub struct BlobUrlRegistry {
    entries: StdMutex<HashMap<String, MediaData>>,
}

impl BlobUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a URL backed by the given media
    pub fn create(&self, media: MediaData) -> String {
        let url = format!("blob:{}", Uuid::new_v4());
        self.lock().insert(url.clone(), media);
        url
    }

    /// Look up the media behind a URL
    pub fn resolve(&self, url: &str) -> Option<MediaData> {
        self.lock().get(url).cloned()
    }

    /// Release a URL. Returns false when it was already revoked.
    pub fn revoke(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    /// Number of live URLs
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MediaData>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// What the surface is currently showing
#[derive(Clone)]
enum SurfaceMode {
    Idle,
    Stream(Arc<dyn LiveStream>),
    Playback(String),
}

/// Serializes all surface source changes so the single video surface
/// never shows a stale or half-attached source.
///
/// Detaching never stops live tracks (the stream owner does that), but
/// it does revoke the playback URL it minted.
pub struct SurfaceController {
    surface: Arc<dyn VideoSurface>,
    urls: Arc<BlobUrlRegistry>,
    mode: StdMutex<SurfaceMode>,
    // Held across attach/detach awaits; a transition in flight blocks
    // the next one instead of racing it
    transition: Mutex<()>,
}

impl SurfaceController {
    pub fn new(surface: Arc<dyn VideoSurface>) -> Self {
        Self {
            surface,
            urls: Arc::new(BlobUrlRegistry::new()),
            mode: StdMutex::new(SurfaceMode::Idle),
            transition: Mutex::new(()),
        }
    }

    /// Show a live stream on the surface
    pub async fn enter_stream(&self, stream: Arc<dyn LiveStream>) -> Result<(), SurfaceError> {
        let _t = self.transition.lock().await;
        self.detach_current().await?;
        self.surface.attach_stream(Arc::clone(&stream)).await?;
        self.set_mode(SurfaceMode::Stream(stream));
        Ok(())
    }

    /// Show a finished recording on the surface. Returns the minted
    /// playback URL.
    pub async fn enter_playback(&self, media: MediaData) -> Result<String, SurfaceError> {
        let _t = self.transition.lock().await;
        self.detach_current().await?;

        let url = self.urls.create(media);
        match self.surface.attach_playback(&url).await {
            Ok(()) => {
                self.set_mode(SurfaceMode::Playback(url.clone()));
                Ok(url)
            }
            Err(e) => {
                // The URL never became visible; release it here since
                // no detach will
                self.urls.revoke(&url);
                Err(e)
            }
        }
    }

    /// Clear the surface
    pub async fn enter_idle(&self) -> Result<(), SurfaceError> {
        let _t = self.transition.lock().await;
        self.detach_current().await
    }

    /// Start playback of the attached recording
    pub async fn play(&self) -> Result<(), SurfaceError> {
        if !self.is_playback() {
            return Err(SurfaceError::PlaybackFailed(
                "no recording attached".to_string(),
            ));
        }
        self.surface.play().await
    }

    /// Pause playback of the attached recording
    pub async fn pause_playback(&self) -> Result<(), SurfaceError> {
        if !self.is_playback() {
            return Err(SurfaceError::PlaybackFailed(
                "no recording attached".to_string(),
            ));
        }
        self.surface.pause_playback().await
    }

    /// Current playback position in seconds
    pub async fn position_secs(&self) -> f64 {
        self.surface.position_secs().await
    }

    /// Whether a recording is attached
    pub fn is_playback(&self) -> bool {
        matches!(*self.mode_guard(), SurfaceMode::Playback(_))
    }

    /// The current playback URL, if any
    pub fn playback_url(&self) -> Option<String> {
        match &*self.mode_guard() {
            SurfaceMode::Playback(url) => Some(url.clone()),
            _ => None,
        }
    }

    /// The URL registry, shared with whoever serves playback bytes
    pub fn url_registry(&self) -> Arc<BlobUrlRegistry> {
        Arc::clone(&self.urls)
    }

    async fn detach_current(&self) -> Result<(), SurfaceError> {
        let previous = {
            let mut mode = self.mode_guard();
            std::mem::replace(&mut *mode, SurfaceMode::Idle)
        };
        match previous {
            SurfaceMode::Idle => Ok(()),
            SurfaceMode::Stream(_) => self.surface.detach().await,
            SurfaceMode::Playback(url) => {
                self.surface.detach().await?;
                self.urls.revoke(&url);
                Ok(())
            }
        }
    }

    fn set_mode(&self, mode: SurfaceMode) {
        *self.mode_guard() = mode;
    }

    fn mode_guard(&self) -> std::sync::MutexGuard<'_, SurfaceMode> {
        self.mode.lock().unwrap_or_else(|e| e.into_inner())
    }
}
