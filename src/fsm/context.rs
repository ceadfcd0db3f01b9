//! Render state threaded through every lifecycle callback.
//!
//! `RenderState` is the single struct that the face's lifecycle handlers
//! read from and write to: display mode, the low-bit capability flag,
//! visibility, and the last refreshed wall-clock time.  Only the engine
//! mutates it; the data-sync path never touches it.

use chrono::{DateTime, FixedOffset, TimeZone};

/// Interactive (full colour, per-second redraw) vs ambient (low power).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Interactive,
    Ambient,
}

/// The shared state read by the draw pass.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Current display mode.
    pub mode: DisplayMode,
    /// Display has reduced colour depth in ambient; text drops anti-aliasing.
    pub low_bit_ambient: bool,
    /// Whether the face is on screen.
    pub visible: bool,
    /// Local wall-clock time as of the last refresh.
    pub current_time: DateTime<FixedOffset>,
}

impl RenderState {
    /// Hidden, interactive, epoch time in UTC until the first refresh.
    pub fn new() -> Self {
        Self {
            mode: DisplayMode::Interactive,
            low_bit_ambient: false,
            visible: false,
            current_time: DateTime::<FixedOffset>::default(),
        }
    }

    pub fn is_ambient(&self) -> bool {
        self.mode == DisplayMode::Ambient
    }

    /// Text is anti-aliased except in ambient on low-bit displays.
    pub fn text_anti_alias(&self) -> bool {
        !(self.low_bit_ambient && self.is_ambient())
    }

    /// Set `current_time` from an epoch timestamp in the given zone.
    /// Out-of-range timestamps leave the previous time in place.
    pub fn refresh_time(&mut self, now_millis: i64, offset: FixedOffset) {
        if let Some(t) = offset.timestamp_millis_opt(now_millis).single() {
            self.current_time = t;
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}
