//! Recording session entity

use std::fmt;

use crate::domain::media::{MediaData, MediaMimeType};

/// Engine-level recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Recording,
    Paused,
}

impl SessionPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recording session: the accumulating chunk sequence plus the
/// wall-clock bookkeeping needed to derive the recorded duration across
/// pause/resume cycles.
///
/// Transitions that do not match the current phase are silent no-ops,
/// reported through the `bool` return so callers can skip side effects.
/// The finalized blob is only observable after a completed session.
#[derive(Debug, Default)]
pub struct RecordingSession {
    phase: SessionPhase,
    chunks: Vec<Vec<u8>>,
    started_at_ms: Option<u64>,
    paused_since_ms: Option<u64>,
    accumulated_paused_ms: u64,
    completed: bool,
}

impl RecordingSession {
    /// Create a new idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the session is recording or paused
    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Recording | SessionPhase::Paused)
    }

    /// Begin recording at `now_ms`. Discards any previous chunks.
    /// No-op unless idle.
    pub fn begin(&mut self, now_ms: u64) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.chunks.clear();
        self.started_at_ms = Some(now_ms);
        self.paused_since_ms = None;
        self.accumulated_paused_ms = 0;
        self.completed = false;
        self.phase = SessionPhase::Recording;
        true
    }

    /// Pause at `now_ms`. No-op unless recording.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.phase != SessionPhase::Recording {
            return false;
        }
        self.paused_since_ms = Some(now_ms);
        self.phase = SessionPhase::Paused;
        true
    }

    /// Resume at `now_ms`, folding the pause gap into the accumulator.
    /// No-op unless paused.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        if let Some(paused_since) = self.paused_since_ms.take() {
            self.accumulated_paused_ms += now_ms.saturating_sub(paused_since);
        }
        self.phase = SessionPhase::Recording;
        true
    }

    /// Finish the session at `now_ms`, from recording or paused.
    /// No-op when already idle.
    pub fn finish(&mut self, now_ms: u64) -> bool {
        match self.phase {
            SessionPhase::Idle => false,
            SessionPhase::Paused => {
                if let Some(paused_since) = self.paused_since_ms.take() {
                    self.accumulated_paused_ms += now_ms.saturating_sub(paused_since);
                }
                self.phase = SessionPhase::Idle;
                self.completed = true;
                true
            }
            SessionPhase::Recording => {
                self.phase = SessionPhase::Idle;
                self.completed = true;
                true
            }
        }
    }

    /// Discard all session data and return to idle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Append an encoded chunk. Chunks only accumulate while active.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if self.is_active() && !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// Number of accumulated chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Recorded duration at `now_ms`: elapsed wall-clock time minus the
    /// accumulated paused time. Re-derived on every call, never counted.
    pub fn recorded_ms(&self, now_ms: u64) -> u64 {
        let Some(started) = self.started_at_ms else {
            return 0;
        };
        let paused = match (self.phase, self.paused_since_ms) {
            (SessionPhase::Paused, Some(since)) => {
                self.accumulated_paused_ms + now_ms.saturating_sub(since)
            }
            _ => self.accumulated_paused_ms,
        };
        now_ms.saturating_sub(started).saturating_sub(paused)
    }

    /// Assemble the finalized blob. Only available once the session has
    /// completed (stopped); an in-flight or empty session yields `None`.
    pub fn assemble(&self, mime_type: MediaMimeType) -> Option<MediaData> {
        if !self.completed || self.chunks.is_empty() || self.phase != SessionPhase::Idle {
            return None;
        }
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }
        Some(MediaData::new(data, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.is_active());
        assert_eq!(session.chunk_count(), 0);
    }

    #[test]
    fn begin_from_idle() {
        let mut session = RecordingSession::new();
        assert!(session.begin(1000));
        assert_eq!(session.phase(), SessionPhase::Recording);
    }

    #[test]
    fn begin_while_recording_is_noop() {
        let mut session = RecordingSession::new();
        session.begin(1000);
        assert!(!session.begin(2000));
        assert_eq!(session.recorded_ms(3000), 2000);
    }

    #[test]
    fn pause_and_resume_adjust_recorded_time() {
        let mut session = RecordingSession::new();
        session.begin(0);
        assert!(session.pause(10_000));
        // Paused time does not count against the recording
        assert_eq!(session.recorded_ms(15_000), 10_000);
        assert!(session.resume(15_000));
        assert_eq!(session.recorded_ms(20_000), 15_000);
    }

    #[test]
    fn pause_freezes_recorded_time_exactly() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.pause(8_000);
        let at_pause = session.recorded_ms(8_000);
        session.resume(12_000);
        let at_resume = session.recorded_ms(12_000);
        assert_eq!(at_pause, at_resume);
    }

    #[test]
    fn pause_outside_recording_is_noop() {
        let mut session = RecordingSession::new();
        assert!(!session.pause(100));
        session.begin(0);
        session.pause(100);
        assert!(!session.pause(200));
    }

    #[test]
    fn resume_outside_paused_is_noop() {
        let mut session = RecordingSession::new();
        assert!(!session.resume(100));
        session.begin(0);
        assert!(!session.resume(200));
    }

    #[test]
    fn finish_from_paused_folds_final_gap() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.pause(5_000);
        assert!(session.finish(9_000));
        assert_eq!(session.recorded_ms(9_000), 5_000);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn finish_when_idle_is_noop() {
        let mut session = RecordingSession::new();
        assert!(!session.finish(100));
    }

    #[test]
    fn chunks_accumulate_only_while_active() {
        let mut session = RecordingSession::new();
        session.push_chunk(vec![1]);
        assert_eq!(session.chunk_count(), 0);

        session.begin(0);
        session.push_chunk(vec![1, 2]);
        session.pause(1_000);
        session.push_chunk(vec![3]);
        assert_eq!(session.chunk_count(), 2);
    }

    #[test]
    fn empty_chunks_are_dropped() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.push_chunk(Vec::new());
        assert_eq!(session.chunk_count(), 0);
    }

    #[test]
    fn assemble_unavailable_while_active() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.push_chunk(vec![1, 2, 3]);
        assert!(session.assemble(MediaMimeType::Wav).is_none());
    }

    #[test]
    fn assemble_concatenates_after_finish() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.push_chunk(vec![1, 2]);
        session.push_chunk(vec![3]);
        session.finish(5_000);

        let blob = session.assemble(MediaMimeType::Wav).unwrap();
        assert_eq!(blob.data(), &[1, 2, 3]);
        assert_eq!(blob.mime_type(), MediaMimeType::Wav);
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.push_chunk(vec![1]);
        session.finish(1_000);
        session.reset();

        assert_eq!(session.chunk_count(), 0);
        assert!(session.assemble(MediaMimeType::Wav).is_none());
        assert_eq!(session.recorded_ms(2_000), 0);
    }

    #[test]
    fn begin_discards_previous_chunks() {
        let mut session = RecordingSession::new();
        session.begin(0);
        session.push_chunk(vec![1]);
        session.finish(1_000);

        session.begin(2_000);
        assert_eq!(session.chunk_count(), 0);
    }
}
