//! Recording countdown timer

use std::sync::Arc;
use std::time::Instant;

use super::duration::Duration;

/// Wall-clock source, injectable so timer behavior can be tested
/// against a simulated clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

/// Production clock based on a monotonic instant
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for deterministic tests
pub struct ManualClock {
    now_ms: std::sync::atomic::AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now_ms: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Move the clock forward
    pub fn advance_ms(&self, ms: u64) {
        self.now_ms
            .fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    /// Set the clock to an absolute value
    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Derives the remaining recording time from wall-clock deltas.
///
/// `time_left` is always re-derived as
/// `max - ((now - started) - accumulated_paused)` rather than counted
/// down, so it cannot drift under timer jitter and re-synchronizes
/// after the host throttles background timers.
pub struct RecordingTimer {
    max: Duration,
    clock: Arc<dyn Clock>,
    started_at_ms: Option<u64>,
    paused_since_ms: Option<u64>,
    accumulated_paused_ms: u64,
}

impl RecordingTimer {
    pub fn new(max: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max,
            clock,
            started_at_ms: None,
            paused_since_ms: None,
            accumulated_paused_ms: 0,
        }
    }

    /// The configured maximum duration
    pub fn max_duration(&self) -> Duration {
        self.max
    }

    /// Arm the timer at the current instant
    pub fn start(&mut self) {
        self.started_at_ms = Some(self.clock.now_ms());
        self.paused_since_ms = None;
        self.accumulated_paused_ms = 0;
    }

    /// Freeze the timer
    pub fn pause(&mut self) {
        if self.started_at_ms.is_some() && self.paused_since_ms.is_none() {
            self.paused_since_ms = Some(self.clock.now_ms());
        }
    }

    /// Unfreeze the timer, folding the pause gap into the accumulator
    pub fn resume(&mut self) {
        if let Some(paused_since) = self.paused_since_ms.take() {
            self.accumulated_paused_ms += self.clock.now_ms().saturating_sub(paused_since);
        }
    }

    /// Return to the idle state; `time_left` reads as the full maximum
    pub fn reset(&mut self) {
        self.started_at_ms = None;
        self.paused_since_ms = None;
        self.accumulated_paused_ms = 0;
    }

    /// Milliseconds of recorded (pause-adjusted) time so far
    pub fn recorded_ms(&self) -> u64 {
        let Some(started) = self.started_at_ms else {
            return 0;
        };
        let now = self.clock.now_ms();
        let paused = match self.paused_since_ms {
            Some(since) => self.accumulated_paused_ms + now.saturating_sub(since),
            None => self.accumulated_paused_ms,
        };
        now.saturating_sub(started).saturating_sub(paused)
    }

    /// Seconds remaining before the maximum duration is reached
    pub fn time_left_secs(&self) -> u64 {
        let left_ms = self.max.as_millis().saturating_sub(self.recorded_ms());
        // Round up so the display only hits 0 at the actual deadline
        left_ms.div_ceil(1000)
    }
}
