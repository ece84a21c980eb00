//! Recording domain: durations, formats, session state and timing

pub mod duration;
pub mod format;
pub mod session;
pub mod timer;

pub use duration::Duration;
pub use format::{negotiate_format, RecordingFormat};
pub use session::{RecordingSession, SessionPhase};
pub use timer::{Clock, ManualClock, RecordingTimer, SystemClock};
