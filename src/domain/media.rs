//! Media data value object

use std::fmt;

/// Supported media MIME types, video and audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaMimeType {
    Mp4,
    Webm,
    Wav,
    Mp3,
    Ogg,
}

impl MediaMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mp3",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Whether this is a video container type
    pub const fn is_video(&self) -> bool {
        matches!(self, Self::Mp4 | Self::Webm)
    }

    /// Parse a MIME string, ignoring any codec parameters
    /// (e.g. "video/mp4;codecs=h264" parses as Mp4).
    pub fn parse(s: &str) -> Option<Self> {
        let base = s.split(';').next().unwrap_or("").trim();
        match base {
            "video/mp4" | "audio/mp4" => Some(Self::Mp4),
            "video/webm" | "audio/webm" => Some(Self::Webm),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/mp3" | "audio/mpeg" => Some(Self::Mp3),
            "audio/ogg" => Some(Self::Ogg),
            _ => None,
        }
    }
}

impl fmt::Display for MediaMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for MediaMimeType {
    fn default() -> Self {
        Self::Wav
    }
}

/// Value object holding encoded media bytes and their MIME type.
/// Used for both recorded video blobs and extracted audio.
#[derive(Debug, Clone)]
pub struct MediaData {
    data: Vec<u8>,
    mime_type: MediaMimeType,
}

impl MediaData {
    /// Create MediaData from raw bytes
    pub fn new(data: Vec<u8>, mime_type: MediaMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Create MediaData from a byte slice
    pub fn from_bytes(data: &[u8], mime_type: MediaMimeType) -> Self {
        Self {
            data: data.to_vec(),
            mime_type,
        }
    }

    /// Get the raw media data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw media data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> MediaMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the media data as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Decode base64-encoded media data
    pub fn from_base64(encoded: &str, mime_type: MediaMimeType) -> Option<Self> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()
            .map(|data| Self::new(data, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(MediaMimeType::Mp4.as_str(), "video/mp4");
        assert_eq!(MediaMimeType::Webm.as_str(), "video/webm");
        assert_eq!(MediaMimeType::Wav.as_str(), "audio/wav");
    }

    #[test]
    fn mime_type_extension() {
        assert_eq!(MediaMimeType::Mp4.extension(), "mp4");
        assert_eq!(MediaMimeType::Wav.extension(), "wav");
    }

    #[test]
    fn mime_type_video_classification() {
        assert!(MediaMimeType::Mp4.is_video());
        assert!(MediaMimeType::Webm.is_video());
        assert!(!MediaMimeType::Wav.is_video());
    }

    #[test]
    fn parse_strips_codec_params() {
        assert_eq!(
            MediaMimeType::parse("video/mp4;codecs=h264"),
            Some(MediaMimeType::Mp4)
        );
        assert_eq!(
            MediaMimeType::parse("video/webm; codecs=vp9"),
            Some(MediaMimeType::Webm)
        );
    }

    #[test]
    fn parse_audio_variants() {
        assert_eq!(MediaMimeType::parse("audio/x-wav"), Some(MediaMimeType::Wav));
        assert_eq!(MediaMimeType::parse("audio/mpeg"), Some(MediaMimeType::Mp3));
        assert_eq!(MediaMimeType::parse("application/pdf"), None);
    }

    #[test]
    fn media_data_size() {
        let data = MediaData::new(vec![0u8; 1024], MediaMimeType::Mp4);
        assert_eq!(data.size_bytes(), 1024);
    }

    #[test]
    fn human_readable_size_bytes() {
        let data = MediaData::new(vec![0u8; 500], MediaMimeType::Wav);
        assert_eq!(data.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let data = MediaData::new(vec![0u8; 2048], MediaMimeType::Wav);
        assert_eq!(data.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let data = MediaData::new(vec![0u8; 2 * 1024 * 1024], MediaMimeType::Mp4);
        assert_eq!(data.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn base64_round_trip() {
        let data = MediaData::new(vec![1, 2, 3, 4], MediaMimeType::Wav);
        let b64 = data.to_base64();
        let decoded = MediaData::from_base64(&b64, MediaMimeType::Wav).unwrap();
        assert_eq!(decoded.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn from_base64_rejects_garbage() {
        assert!(MediaData::from_base64("not base64!!!", MediaMimeType::Wav).is_none());
    }

    #[test]
    fn from_bytes() {
        let bytes = [1u8, 2, 3, 4];
        let data = MediaData::from_bytes(&bytes, MediaMimeType::Webm);
        assert_eq!(data.data(), &[1, 2, 3, 4]);
        assert_eq!(data.mime_type(), MediaMimeType::Webm);
    }
}
