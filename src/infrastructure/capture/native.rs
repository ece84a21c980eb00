//! Native camera/microphone capture
//!
//! The camera runs on a dedicated thread because nokhwa's `Camera` is
//! not `Send`, and the microphone runs on its own thread because
//! `cpal::Stream` is not `Send` either. Both threads watch a shared
//! live flag and release the hardware when it drops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::application::ports::{
    AudioTap, CaptureBackend, CaptureError, LiveStream, StreamRequest,
};
use crate::infrastructure::recording::wav;

const CAPTURE_FPS: u32 = 30;

pub struct NativeCaptureBackend;

impl NativeCaptureBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A running camera/microphone pair
pub struct NativeLiveStream {
    id: Uuid,
    camera_id: String,
    microphone_id: Option<String>,
    live: Arc<AtomicBool>,
    tap: AudioTap,
}

impl LiveStream for NativeLiveStream {
    fn id(&self) -> Uuid {
        self.id
    }

    fn camera_id(&self) -> &str {
        &self.camera_id
    }

    fn microphone_id(&self) -> Option<&str> {
        self.microphone_id.as_deref()
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

/// Map a device id onto a nokhwa index. Numeric ids address by index,
/// anything else addresses by platform path.
fn parse_camera_index(id: Option<&str>) -> CameraIndex {
    match id {
        None => CameraIndex::Index(0),
        Some(id) => match id.parse::<u32>() {
            Ok(n) => CameraIndex::Index(n),
            Err(_) => CameraIndex::String(id.to_string()),
        },
    }
}

fn classify_capture_error(message: &str, device: &str) -> CaptureError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        CaptureError::PermissionDenied(message.to_string())
    } else if lower.contains("not found") || lower.contains("no device") {
        CaptureError::NotFound(device.to_string())
    } else {
        CaptureError::Hardware(message.to_string())
    }
}

/// Open the camera and pump frames until the live flag drops
fn run_camera_thread(
    request_id: Option<String>,
    width: u32,
    height: u32,
    live: Arc<AtomicBool>,
    ready: oneshot::Sender<Result<String, CaptureError>>,
) {
    let index = parse_camera_index(request_id.as_deref());
    let format = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(
        CameraFormat::new_from(width, height, FrameFormat::MJPEG, CAPTURE_FPS),
    ));

    let mut camera = match Camera::new(index.clone(), format) {
        Ok(camera) => camera,
        Err(e) => {
            let device = request_id.unwrap_or_else(|| "default camera".to_string());
            let _ = ready.send(Err(classify_capture_error(&e.to_string(), &device)));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let device = request_id.unwrap_or_else(|| "default camera".to_string());
        let _ = ready.send(Err(classify_capture_error(&e.to_string(), &device)));
        return;
    }

    let opened_id = match index {
        CameraIndex::Index(i) => i.to_string(),
        CameraIndex::String(s) => s,
    };
    if ready.send(Ok(opened_id)).is_err() {
        // Nobody is waiting for this stream anymore
        let _ = camera.stop_stream();
        return;
    }

    while live.load(Ordering::SeqCst) {
        // frame() blocks at the device frame rate, so this loop idles
        // between frames without spinning
        if camera.frame().is_err() {
            break;
        }
    }

    live.store(false, Ordering::SeqCst);
    let _ = camera.stop_stream();
}

/// Open the microphone and feed mono samples into the tap
fn run_audio_thread(
    request_id: Option<String>,
    tap: AudioTap,
    live: Arc<AtomicBool>,
    ready: oneshot::Sender<Result<(Option<String>, u32), CaptureError>>,
) {
    let host = cpal::default_host();

    let device = match &request_id {
        Some(id) => {
            let found = host
                .input_devices()
                .ok()
                .and_then(|mut devices| devices.find(|d| d.name().ok().as_deref() == Some(id)));
            match found {
                Some(device) => device,
                None => {
                    let _ = ready.send(Err(CaptureError::NotFound(id.clone())));
                    return;
                }
            }
        }
        None => match host.default_input_device() {
            Some(device) => device,
            None => {
                let _ = ready.send(Err(CaptureError::NotFound(
                    "default microphone".to_string(),
                )));
                return;
            }
        },
    };

    let config = match device.default_input_config() {
        Ok(config) => config,
        Err(e) => {
            let device_label = request_id.clone().unwrap_or_else(|| "microphone".to_string());
            let _ = ready.send(Err(classify_capture_error(&e.to_string(), &device_label)));
            return;
        }
    };

    let sample_format = config.sample_format();
    let sample_rate = config.sample_rate().0;
    let channels = config.channels();
    let stream_config: cpal::StreamConfig = config.into();

    // The tap caps its own buffer, so an idle preview that nobody
    // drains cannot grow without bound
    let mut sink = tap.clone();
    sink.sample_rate = sample_rate;
    let gate = Arc::clone(&live);
    let on_error = |err| eprintln!("Audio stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if gate.load(Ordering::SeqCst) {
                    sink.push(&wav::downmix_to_mono(data, channels));
                }
            },
            on_error,
            None,
        ),
        SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if gate.load(Ordering::SeqCst) {
                    let i16_data: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    sink.push(&wav::downmix_to_mono(&i16_data, channels));
                }
            },
            on_error,
            None,
        ),
        other => {
            let _ = ready.send(Err(CaptureError::Hardware(format!(
                "Unsupported sample format: {:?}",
                other
            ))));
            return;
        }
    };

    let stream = match stream {
        Ok(stream) => stream,
        Err(e) => {
            let device_label = request_id.clone().unwrap_or_else(|| "microphone".to_string());
            let _ = ready.send(Err(classify_capture_error(&e.to_string(), &device_label)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let device_label = request_id.clone().unwrap_or_else(|| "microphone".to_string());
        let _ = ready.send(Err(classify_capture_error(&e.to_string(), &device_label)));
        return;
    }

    let opened_id = match request_id {
        Some(id) => Some(id),
        None => device.name().ok(),
    };
    if ready.send(Ok((opened_id, sample_rate))).is_err() {
        drop(stream);
        return;
    }

    while live.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
    drop(stream);
}

#[async_trait]
impl CaptureBackend for NativeCaptureBackend {
    async fn open(&self, request: StreamRequest) -> Result<Arc<dyn LiveStream>, CaptureError> {
        let live = Arc::new(AtomicBool::new(true));
        let tap = AudioTap::new(request.audio.sample_rate);

        let (camera_ready_tx, camera_ready_rx) = oneshot::channel();
        let camera_live = Arc::clone(&live);
        let camera_id = request.camera_id.clone();
        let (width, height) = (request.video.ideal_width, request.video.ideal_height);
        std::thread::spawn(move || {
            run_camera_thread(camera_id, width, height, camera_live, camera_ready_tx)
        });

        let (audio_ready_tx, audio_ready_rx) = oneshot::channel();
        let audio_live = Arc::clone(&live);
        let audio_tap = tap.clone();
        let microphone_id = request.microphone_id.clone();
        std::thread::spawn(move || {
            run_audio_thread(microphone_id, audio_tap, audio_live, audio_ready_tx)
        });

        let camera_id = match camera_ready_rx.await {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                live.store(false, Ordering::SeqCst);
                return Err(e);
            }
            Err(_) => {
                live.store(false, Ordering::SeqCst);
                return Err(CaptureError::Hardware("camera thread exited".to_string()));
            }
        };

        let (microphone_id, device_rate) = match audio_ready_rx.await {
            Ok(Ok(opened)) => opened,
            Ok(Err(e)) => {
                live.store(false, Ordering::SeqCst);
                return Err(e);
            }
            Err(_) => {
                live.store(false, Ordering::SeqCst);
                return Err(CaptureError::Hardware(
                    "microphone thread exited".to_string(),
                ));
            }
        };

        let mut tap = tap;
        tap.sample_rate = device_rate;

        Ok(Arc::new(NativeLiveStream {
            id: Uuid::new_v4(),
            camera_id,
            microphone_id,
            live,
            tap,
        }))
    }
}
