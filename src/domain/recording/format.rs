//! Recording container/codec negotiation

use crate::domain::media::MediaMimeType;

/// Candidate recording formats, in order of playback compatibility.
///
/// MP4/H.264 plays back on the widest range of devices, but not every
/// runtime can encode it; WebM/H.264 is the next best, and the platform
/// default container is the last resort that always works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingFormat {
    Mp4H264,
    WebmH264,
    PlatformDefault,
}

impl RecordingFormat {
    /// Preference order tried during negotiation
    pub const PREFERENCE: [RecordingFormat; 3] = [
        RecordingFormat::Mp4H264,
        RecordingFormat::WebmH264,
        RecordingFormat::PlatformDefault,
    ];

    /// The MIME string requested from the recording primitive.
    /// Empty for the platform default, which means "whatever you have".
    pub const fn requested_mime(&self) -> &'static str {
        match self {
            Self::Mp4H264 => "video/mp4;codecs=h264",
            Self::WebmH264 => "video/webm;codecs=h264",
            Self::PlatformDefault => "",
        }
    }

    /// The container MIME type of blobs produced in this format.
    /// `None` for the platform default; the recorder reports its own.
    pub const fn container_mime(&self) -> Option<MediaMimeType> {
        match self {
            Self::Mp4H264 => Some(MediaMimeType::Mp4),
            Self::WebmH264 => Some(MediaMimeType::Webm),
            Self::PlatformDefault => None,
        }
    }
}

/// Pick the first format the runtime accepts, trying the preference
/// order. Returns `None` when even the platform default is refused.
pub fn negotiate_format<F>(supports: F) -> Option<RecordingFormat>
where
    F: Fn(RecordingFormat) -> bool,
{
    RecordingFormat::PREFERENCE
        .iter()
        .copied()
        .find(|format| supports(*format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiation_prefers_mp4() {
        let format = negotiate_format(|_| true);
        assert_eq!(format, Some(RecordingFormat::Mp4H264));
    }

    #[test]
    fn negotiation_falls_through_to_webm() {
        let format = negotiate_format(|f| f != RecordingFormat::Mp4H264);
        assert_eq!(format, Some(RecordingFormat::WebmH264));
    }

    #[test]
    fn negotiation_falls_through_to_platform_default() {
        let format = negotiate_format(|f| f == RecordingFormat::PlatformDefault);
        assert_eq!(format, Some(RecordingFormat::PlatformDefault));
    }

    #[test]
    fn negotiation_fails_when_nothing_supported() {
        assert_eq!(negotiate_format(|_| false), None);
    }

    #[test]
    fn requested_mime_strings() {
        assert_eq!(RecordingFormat::Mp4H264.requested_mime(), "video/mp4;codecs=h264");
        assert_eq!(RecordingFormat::PlatformDefault.requested_mime(), "");
    }

    #[test]
    fn container_mime_mapping() {
        assert_eq!(
            RecordingFormat::Mp4H264.container_mime(),
            Some(MediaMimeType::Mp4)
        );
        assert_eq!(RecordingFormat::PlatformDefault.container_mime(), None);
    }
}
