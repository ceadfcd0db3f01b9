//! Cancellable, self-correcting periodic tick timer.
//!
//! Drives the interactive redraw while the face is visible and not in
//! ambient mode.  The engine owns the timer outright and polls it from its
//! cooperative loop, so there is no callback handle that could outlive the
//! engine.
//!
//! ```text
//!  start(now) ──▶ deadline = now            (fire immediately)
//!  poll(now ≥ deadline) ──▶ fire, deadline = now + (interval − now mod interval)
//!  cancel() ──▶ deadline = None
//! ```
//!
//! Re-arming from the current wall-clock time (rather than adding a fixed
//! interval to the previous deadline) keeps ticks on second boundaries no
//! matter how long the previous tick's work took.

use log::debug;

/// Delay from `now_ms` to the next multiple of `interval_ms`.
///
/// Always in `1..=interval_ms`: a time sitting exactly on a boundary waits
/// a full interval.
pub fn delay_to_next_tick(now_ms: i64, interval_ms: u32) -> u32 {
    let interval = i64::from(interval_ms.max(1));
    (interval - now_ms.rem_euclid(interval)) as u32
}

/// Periodic wake-up aligned to wall-clock interval boundaries.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval_ms: u32,
    /// Absolute time (epoch ms) of the next tick; `None` while cancelled.
    deadline: Option<i64>,
    /// Ticks fired since construction.
    fired: u64,
}

impl TickTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            deadline: None,
            fired: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Next scheduled tick, if running.
    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Arm the timer with an immediate first tick.  Restarting a running
    /// timer discards its pending deadline.
    pub fn start(&mut self, now_ms: i64) {
        self.deadline = Some(now_ms);
        debug!("TickTimer: started at {}", now_ms);
    }

    /// Drop any pending tick.  Idempotent.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("TickTimer: cancelled");
        }
    }

    /// Fire if the deadline has passed.  On fire the timer re-arms itself
    /// for the next interval boundary after `now_ms`.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.fired += 1;
                let delay = delay_to_next_tick(now_ms, self.interval_ms);
                self.deadline = Some(now_ms + i64::from(delay));
                true
            }
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
