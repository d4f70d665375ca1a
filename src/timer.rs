//! Reading session timer
//!
//! Tracks elapsed active-reading seconds for a single book. Purely in-memory;
//! the timer lives and dies with the session that owns it. When elapsed-time
//! tracking is disabled by preference, the timer never accumulates -- all
//! start/pause/resume calls are no-ops, not merely masked at read time.
//!
//! Time is read through `tokio::time::Instant` so tests can drive the clock
//! deterministically under `start_paused`.

use std::time::Duration;
use tokio::time::Instant;

/// Pausable elapsed-seconds counter for one reading session
#[derive(Debug)]
pub struct ReadingTimer {
    /// Time accumulated across completed running intervals, seeded from the
    /// persisted progress snapshot
    accumulated: Duration,
    /// Start of the current running interval, if running
    started_at: Option<Instant>,
    enabled: bool,
}

impl ReadingTimer {
    /// Create a timer seeded with the persisted elapsed seconds, if any.
    ///
    /// A disabled timer reports its initial value forever.
    pub fn new(initial_seconds: Option<u64>, enabled: bool) -> Self {
        Self {
            accumulated: Duration::from_secs(initial_seconds.unwrap_or(0)),
            started_at: None,
            enabled,
        }
    }

    /// Begin accumulating. No-op if already running or disabled.
    pub fn start(&mut self) {
        if self.enabled && self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Freeze accumulation. No-op if already paused.
    pub fn pause(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += started_at.elapsed();
        }
    }

    /// Resume from the frozen value. No-op if already running or disabled.
    pub fn resume(&mut self) {
        self.start();
    }

    /// Zero the counter without changing the running state. A running timer
    /// keeps running, restarting its current interval from now.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Total elapsed seconds, including the in-progress interval
    pub fn total_seconds(&self) -> u64 {
        let running = self
            .started_at
            .map(|started_at| started_at.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.accumulated + running).as_secs()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
