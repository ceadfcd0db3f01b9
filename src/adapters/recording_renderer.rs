//! Headless renderer adapter.
//!
//! Implements [`Renderer`] by recording every draw call as a
//! [`DrawCommand`].  Text is measured with a fixed advance of half the
//! text size per character, which is enough for layout assertions and for
//! the demo binary's frame dumps.  Icon resources can be made to "go
//! missing" to exercise the no-icon degradation path.

use crate::app::ports::{RenderError, Renderer};
use crate::config::Rgb;
use crate::render::{Indicator, Point, TextBounds, TextRole, TextStyle};
use crate::sync::IconId;

/// Character advance as a fraction of text size.
const ADVANCE_RATIO: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background(Rgb),
    Text {
        text: String,
        at: Point,
        role: TextRole,
        anti_alias: bool,
    },
    Line {
        from: Point,
        to: Point,
    },
    Icon {
        icon: IconId,
        at: Point,
        size: f32,
    },
    Indicator(Indicator),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    /// Index of the latest `Background` command (start of the last frame).
    frame_start: usize,
    frames: u64,
    missing_icons: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose icon resources all fail to resolve.
    pub fn with_missing_icons() -> Self {
        Self {
            missing_icons: true,
            ..Self::default()
        }
    }

    pub fn set_missing_icons(&mut self, missing: bool) {
        self.missing_icons = missing;
    }

    /// Number of frames begun (background fills).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands of the most recent frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.commands[self.frame_start..]
    }

    /// Text runs of the most recent frame, in paint order.
    pub fn last_frame_texts(&self) -> Vec<&str> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_frame_has_icon(&self) -> bool {
        self.last_frame()
            .iter()
            .any(|c| matches!(c, DrawCommand::Icon { .. }))
    }

    pub fn last_frame_has_indicator(&self, indicator: Indicator) -> bool {
        self.last_frame()
            .iter()
            .any(|c| *c == DrawCommand::Indicator(indicator))
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.frame_start = 0;
    }
}

impl Renderer for RecordingRenderer {
    fn fill_background(&mut self, colour: Rgb) {
        self.frame_start = self.commands.len();
        self.frames += 1;
        self.commands.push(DrawCommand::Background(colour));
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextBounds {
        TextBounds {
            width: text.chars().count() as f32 * style.size * ADVANCE_RATIO,
            height: style.size,
        }
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            role: style.role,
            anti_alias: style.anti_alias,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, _style: &TextStyle) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn draw_icon(&mut self, icon: IconId, at: Point, size: f32) -> Result<f32, RenderError> {
        if self.missing_icons {
            return Err(RenderError::IconNotFound);
        }
        self.commands.push(DrawCommand::Icon { icon, at, size });
        Ok(size)
    }

    fn draw_indicator(&mut self, indicator: Indicator, _at: Point) {
        self.commands.push(DrawCommand::Indicator(indicator));
    }
}
