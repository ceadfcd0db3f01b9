//! Host wall-clock adapter.
//!
//! Reads the local time and zone through `chrono::Local`.  Zone changes are
//! detected by polling: while watching, [`SystemClock::zone_changed`]
//! compares the current offset with the one seen last, and the host loop
//! forwards a change to the engine's `on_time_zone_changed`.

use chrono::{FixedOffset, Local, Offset};
use log::debug;

use crate::app::ports::ClockPort;

#[derive(Debug)]
pub struct SystemClock {
    watching: bool,
    last_offset: FixedOffset,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            watching: false,
            last_offset: Local::now().offset().fix(),
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// `true` once per observed offset change while watching.
    pub fn zone_changed(&mut self) -> bool {
        if !self.watching {
            return false;
        }
        let current = self.utc_offset();
        if current == self.last_offset {
            return false;
        }
        debug!("SystemClock: offset {} -> {}", self.last_offset, current);
        self.last_offset = current;
        true
    }
}

impl ClockPort for SystemClock {
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }

    fn utc_offset(&self) -> FixedOffset {
        Local::now().offset().fix()
    }

    fn watch_time_zone(&mut self) {
        self.watching = true;
        self.last_offset = self.utc_offset();
    }

    fn unwatch_time_zone(&mut self) {
        self.watching = false;
    }
}
