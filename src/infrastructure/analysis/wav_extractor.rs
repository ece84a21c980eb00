//! Audio extraction from finished recordings
//!
//! Recordings produced by the WAV chunk recorder arrive as streaming
//! blobs with sentinel sizes in the header. This adapter decodes them,
//! downmixes to mono, resamples to the transcription rate and
//! re-encodes a well-formed WAV. Compressed video containers are
//! declined so callers can fall back to server-side extraction.

use async_trait::async_trait;
use rubato::{FftFixedIn, Resampler};

use crate::application::ports::{AudioExtractor, ExtractError};
use crate::domain::{MediaData, MediaMimeType};
use crate::infrastructure::recording::wav;

/// Sample rate the transcription providers expect
const TARGET_SAMPLE_RATE: u32 = 44_100;

const RESAMPLE_CHUNK: usize = 1024;

pub struct WavAudioExtractor;

impl WavAudioExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WavAudioExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioExtractor for WavAudioExtractor {
    async fn extract(&self, recording: &MediaData) -> Result<MediaData, ExtractError> {
        if recording.mime_type() != MediaMimeType::Wav {
            return Err(ExtractError::UnsupportedFormat(recording.mime_type()));
        }

        let (sample_rate, channels, samples) = wav::parse_streaming(recording.data())
            .ok_or_else(|| ExtractError::Failed("malformed WAV stream".to_string()))?;
        if samples.is_empty() {
            return Err(ExtractError::Failed("recording has no audio".to_string()));
        }

        let mono = wav::downmix_to_mono(&samples, channels);
        let resampled = resample(&mono, sample_rate, TARGET_SAMPLE_RATE)
            .map_err(|e| ExtractError::Failed(format!("resample failed: {}", e)))?;

        let bytes = wav::encode_wav(&resampled, TARGET_SAMPLE_RATE)
            .map_err(|e| ExtractError::Failed(format!("WAV encode failed: {}", e)))?;

        Ok(MediaData::new(bytes, MediaMimeType::Wav))
    }
}

/// Resample mono PCM between rates, chunking through an FFT resampler
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Result<Vec<i16>, String> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let floats: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let ratio = to_rate as f64 / from_rate as f64;
    let output_len = (floats.len() as f64 * ratio).ceil() as usize;

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, RESAMPLE_CHUNK, 2, 1)
            .map_err(|e| e.to_string())?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < floats.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(floats.len());

        let mut frame = floats[input_pos..end_pos].to_vec();
        // Final block may come up short of a full frame
        frame.resize(frames_needed, 0.0);

        let resampled = resampler
            .process(&[frame], None)
            .map_err(|e| e.to_string())?;
        output.extend(
            resampled[0]
                .iter()
                .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
        );
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}
