//! Frame composition for the face.
//!
//! The engine hands a [`Renderer`](crate::app::ports::Renderer) to
//! [`frame::draw_frame`] once per invalidated frame.  Everything here is
//! pure geometry and string formatting; pixels are the adapter's problem.
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │          12:34           │  time      y = cy / 2
//!   │     SAT, MAR 2024        │  date      y = cy − 1.5·h
//!   │        ───────           │  divider   y = cy
//!   │   [icon] 72°   54°       │  weather   y = cy + 15   (interactive only)
//!   └──────────────────────────┘
//! ```

pub mod frame;
pub mod layout;

pub use frame::{draw_frame, FrameOutcome, Paints};
pub use layout::{Layout, Shape};

use crate::config::Rgb;

/// Position on the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Measured extent of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub width: f32,
    pub height: f32,
}

/// Size of the surface for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBounds {
    pub width: f32,
    pub height: f32,
}

impl FrameBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn centre(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Which element a style paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    Time,
    Date,
    Temperature,
}

/// Text/stroke style ("paint").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub role: TextRole,
    pub size: f32,
    pub colour: Rgb,
    pub anti_alias: bool,
}

impl TextStyle {
    pub fn new(role: TextRole, size: f32, colour: Rgb) -> Self {
        Self {
            role,
            size,
            colour,
            anti_alias: true,
        }
    }
}

/// Status markers drawn on top of the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// The companion session is failed or suspended.
    ConnectivityDegraded,
}
