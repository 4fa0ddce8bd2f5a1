//! Countdown for the currently open round.
//!
//! ## State
//!
//! The whole clock state is a single atomic deadline (milliseconds on the
//! time source, `0` when idle). Reading `remaining()` is a load, and expiry
//! is claimed with a compare-and-swap on that deadline, so the expiry of a
//! given `start` can be observed by exactly one caller no matter how many
//! threads poll it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::clock::TimeSource;
use crate::error::{EngineError, Result};

const IDLE: u64 = 0;

/// Round countdown with latched expiry.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use puzzle_arena::clock::{ManualTimeSource, RoundClock};
///
/// let time = Arc::new(ManualTimeSource::new());
/// let clock = RoundClock::new(time.clone());
///
/// clock.start(30).unwrap();
/// time.advance_secs(30);
///
/// assert_eq!(clock.remaining_ms(), 0);
/// assert!(clock.poll_expiry());
/// assert!(!clock.poll_expiry()); // signalled once
/// ```
#[derive(Debug)]
pub struct RoundClock {
    source: Arc<dyn TimeSource>,
    deadline: AtomicU64,
}

impl RoundClock {
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        Self {
            source,
            deadline: AtomicU64::new(IDLE),
        }
    }

    /// Begin a countdown of `duration_secs`.
    ///
    /// Fails with `InvalidDuration` for non-positive durations and with
    /// `AlreadyRunning` while a countdown (including an expired one whose
    /// expiry has not been claimed) is active.
    pub fn start(&self, duration_secs: i64) -> Result<()> {
        if duration_secs <= 0 {
            return Err(EngineError::InvalidDuration(duration_secs));
        }
        let duration_ms = u64::try_from(duration_secs)
            .ok()
            .and_then(|s| s.checked_mul(1_000))
            .ok_or(EngineError::InvalidDuration(duration_secs))?;
        // deadline is never IDLE since duration_ms > 0
        let deadline = self.source.now_ms().saturating_add(duration_ms);

        self.deadline
            .compare_exchange(IDLE, deadline, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| EngineError::AlreadyRunning)
    }

    /// Remaining time in milliseconds, clamped to zero. No side effects.
    pub fn remaining_ms(&self) -> u64 {
        match self.deadline.load(Ordering::Acquire) {
            IDLE => 0,
            deadline => deadline.saturating_sub(self.source.now_ms()),
        }
    }

    /// Whether a countdown is active (expired but unclaimed counts as active).
    pub fn is_running(&self) -> bool {
        self.deadline.load(Ordering::Acquire) != IDLE
    }

    /// Halt the countdown early. Idempotent.
    pub fn stop(&self) {
        self.deadline.store(IDLE, Ordering::Release);
    }

    /// Claim the expiry of the current countdown.
    ///
    /// Returns `true` exactly once per `start`, on the first call made at or
    /// after the deadline; the clock is stopped by that call.
    pub fn poll_expiry(&self) -> bool {
        let deadline = self.deadline.load(Ordering::Acquire);
        if deadline == IDLE || self.source.now_ms() < deadline {
            return false;
        }
        self.deadline
            .compare_exchange(deadline, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn now_ms(&self) -> u64 {
        self.source.now_ms()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
