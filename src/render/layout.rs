//! Per-shape layout, recomputed when the window insets are applied.

use crate::config::{Dimensions, FaceConfig};

/// Display outline reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    Round,
    #[default]
    Rectangular,
}

impl Shape {
    pub fn from_round(is_round: bool) -> Self {
        if is_round { Self::Round } else { Self::Rectangular }
    }
}

/// Text sizes resolved for one display shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub shape: Shape,
    pub time_text_size: f32,
    pub date_text_size: f32,
    pub temperature_text_size: f32,
}

impl Layout {
    /// Pick the dimension set for `shape`.  Pure: same inputs, same layout.
    pub fn for_shape(shape: Shape, config: &FaceConfig) -> Self {
        let dims: &Dimensions = match shape {
            Shape::Round => &config.round,
            Shape::Rectangular => &config.rectangular,
        };
        Self {
            shape,
            time_text_size: dims.time_text_size,
            date_text_size: dims.date_text_size,
            temperature_text_size: dims.temperature_text_size,
        }
    }

    /// Weather icons are drawn square at twice the date text size.
    pub fn icon_size(&self) -> f32 {
        self.date_text_size * 2.0
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::for_shape(Shape::default(), &FaceConfig::default())
    }
}
