//! Live stream acquisition use case

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::Mutex;

use super::ports::{CaptureBackend, CaptureError, FormFactor, LiveStream, StreamRequest};

/// How long stream initialization may take before it is abandoned
pub const DEFAULT_INIT_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Owns the single live capture stream.
///
/// At most one stream exists at a time: acquiring always tears the
/// previous stream down first, so two acquisitions can never hold the
/// camera simultaneously.
pub struct StreamAcquirer {
    backend: Arc<dyn CaptureBackend>,
    form_factor: FormFactor,
    init_timeout: StdDuration,
    current: Mutex<Option<Arc<dyn LiveStream>>>,
}

impl StreamAcquirer {
    pub fn new(backend: Arc<dyn CaptureBackend>, form_factor: FormFactor) -> Self {
        Self::with_timeout(backend, form_factor, DEFAULT_INIT_TIMEOUT)
    }

    pub fn with_timeout(
        backend: Arc<dyn CaptureBackend>,
        form_factor: FormFactor,
        init_timeout: StdDuration,
    ) -> Self {
        Self {
            backend,
            form_factor,
            init_timeout,
            current: Mutex::new(None),
        }
    }

    /// Acquire a stream for the requested devices.
    ///
    /// Failures propagate as-is; retry and fallback policy is the
    /// orchestrator's call, not this layer's.
    pub async fn acquire(
        &self,
        camera_id: Option<String>,
        microphone_id: Option<String>,
    ) -> Result<Arc<dyn LiveStream>, CaptureError> {
        let mut current = self.current.lock().await;

        // Teardown before reattach: the old stream must release the
        // hardware before a new open can succeed.
        if let Some(old) = current.take() {
            old.stop();
        }

        let request = StreamRequest::for_devices(camera_id, microphone_id, self.form_factor);
        let stream = self.open_with_timeout(request).await?;

        *current = Some(Arc::clone(&stream));
        Ok(stream)
    }

    /// Stop and drop the current stream, if any
    pub async fn release(&self) {
        if let Some(stream) = self.current.lock().await.take() {
            stream.stop();
        }
    }

    /// The currently held stream, if any
    pub async fn current_stream(&self) -> Option<Arc<dyn LiveStream>> {
        self.current.lock().await.clone()
    }

    async fn open_with_timeout(
        &self,
        request: StreamRequest,
    ) -> Result<Arc<dyn LiveStream>, CaptureError> {
        let backend = Arc::clone(&self.backend);
        let mut open = tokio::spawn(async move { backend.open(request).await });

        match tokio::time::timeout(self.init_timeout, &mut open).await {
            Ok(joined) => joined.map_err(|e| CaptureError::Hardware(e.to_string()))?,
            Err(_) => {
                // The open may still complete after the deadline. A
                // stream that arrives late would hold the camera with
                // nobody owning it, so reap it.
                tokio::spawn(async move {
                    if let Ok(Ok(stream)) = open.await {
                        stream.stop();
                    }
                });
                Err(CaptureError::Timeout)
            }
        }
    }
}
