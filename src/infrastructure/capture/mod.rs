mod native;

pub use native::{NativeCaptureBackend, NativeLiveStream};
