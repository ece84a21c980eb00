//! Streaming WAV helpers
//!
//! A chunked recording cannot know its final length up front, so the
//! first chunk carries a RIFF header with the size fields set to the
//! 0xFFFFFFFF streaming sentinel and every later chunk is raw PCM.
//! Players treat the sentinel as "read to end of file", and the
//! extractor rewrites a well-formed header when finalizing.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Byte length of the streaming header chunk
pub const HEADER_LEN: usize = 44;

/// Size sentinel for a stream of unknown length
const UNKNOWN_SIZE: u32 = 0xFFFF_FFFF;

/// Build the 44-byte streaming header for 16-bit PCM
pub fn streaming_header(sample_rate: u32, channels: u16) -> [u8; HEADER_LEN] {
    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&UNKNOWN_SIZE.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&16u16.to_le_bytes()); // bits per sample
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&UNKNOWN_SIZE.to_le_bytes());
    header
}

/// Convert PCM samples to their little-endian byte form
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Pull the sample rate, channel count and PCM samples back out of a
/// streaming WAV blob. `None` when the blob is not one of ours.
pub fn parse_streaming(data: &[u8]) -> Option<(u32, u16, Vec<i16>)> {
    if data.len() < HEADER_LEN || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return None;
    }

    let channels = u16::from_le_bytes([data[22], data[23]]);
    let sample_rate = u32::from_le_bytes([data[24], data[25], data[26], data[27]]);
    if channels == 0 || sample_rate == 0 {
        return None;
    }

    let payload = &data[HEADER_LEN..];
    let samples = payload
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Some((sample_rate, channels, samples))
}

/// Encode mono PCM samples as a complete, well-formed WAV file
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Mix interleaved multi-channel samples down to mono
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}
