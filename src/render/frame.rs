//! One frame: background, time, date, divider, weather row, indicators.

use core::fmt::Write;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use heapless::String;
use log::{debug, warn};

use crate::app::ports::Renderer;
use crate::config::{FaceConfig, Rgb};
use crate::fsm::context::RenderState;
use crate::sync::WeatherSnapshot;

use super::{FrameBounds, Indicator, Layout, Point, TextRole, TextStyle};

const AMBIENT_BACKGROUND: Rgb = (0, 0, 0);

/// Half-length of the divider under the date.
const DIVIDER_HALF_WIDTH: f32 = 20.0;
/// Weather row starts this far below the vertical centre.
const WEATHER_ROW_GAP: f32 = 15.0;
/// Temperature baseline sits this far below the weather row top.
const TEMPERATURE_BASELINE: f32 = 30.0;
const ICON_SPACING: f32 = 10.0;
const TEMPERATURE_SPACING: f32 = 30.0;

/// Time text is at most "23:59".
pub type TimeText = String<8>;
/// Date text is "DDD, MMM YYYY" plus room for wide years.
pub type DateText = String<24>;

// ---------------------------------------------------------------------------
// Paints
// ---------------------------------------------------------------------------

/// Text styles allocated once at creation and resized on layout changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Paints {
    pub background: Rgb,
    pub time: TextStyle,
    pub date: TextStyle,
    pub temperature: TextStyle,
    /// Square edge of the weather icon.
    pub icon_size: f32,
}

impl Paints {
    pub fn new(config: &FaceConfig, layout: &Layout) -> Self {
        Self {
            background: config.background_colour,
            time: TextStyle::new(TextRole::Time, layout.time_text_size, config.text_colour),
            date: TextStyle::new(TextRole::Date, layout.date_text_size, config.text_colour),
            temperature: TextStyle::new(
                TextRole::Temperature,
                layout.temperature_text_size,
                config.text_colour,
            ),
            icon_size: layout.icon_size(),
        }
    }

    pub fn apply_layout(&mut self, layout: &Layout) {
        self.time.size = layout.time_text_size;
        self.date.size = layout.date_text_size;
        self.temperature.size = layout.temperature_text_size;
        self.icon_size = layout.icon_size();
    }

    pub fn set_anti_alias(&mut self, anti_alias: bool) {
        self.time.anti_alias = anti_alias;
        self.date.anti_alias = anti_alias;
        self.temperature.anti_alias = anti_alias;
    }

    pub fn anti_alias(&self) -> bool {
        self.time.anti_alias
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `H:MM`, 24-hour, no leading zero on the hour.
pub fn format_time(t: &DateTime<FixedOffset>) -> TimeText {
    let mut s = TimeText::new();
    if write!(s, "{}:{:02}", t.hour(), t.minute()).is_err() {
        s.clear();
    }
    s
}

/// `DDD, MMM YYYY` with upper-case English names, e.g. `SAT, MAR 2024`.
pub fn format_date(t: &DateTime<FixedOffset>) -> DateText {
    let mut s = DateText::new();
    if write!(s, "{}, {} {}", t.weekday(), t.format("%b"), t.year()).is_err() {
        s.clear();
    }
    s.make_ascii_uppercase();
    s
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// What the frame ended up containing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// At least one weather element (icon or temperature) was drawn.
    pub weather_drawn: bool,
    /// The snapshot had an icon but its resource could not be drawn.
    pub icon_missing: bool,
}

/// Paint one frame.  Ambient frames carry no weather and no indicators.
pub fn draw_frame<R: Renderer>(
    renderer: &mut R,
    state: &RenderState,
    weather: &WeatherSnapshot,
    paints: &Paints,
    bounds: FrameBounds,
    degraded: bool,
) -> FrameOutcome {
    let centre = bounds.centre();
    let ambient = state.is_ambient();

    renderer.fill_background(if ambient {
        AMBIENT_BACKGROUND
    } else {
        paints.background
    });

    let time = format_time(&state.current_time);
    let time_bounds = renderer.measure_text(&time, &paints.time);
    renderer.draw_text(
        &time,
        Point::new(centre.x - time_bounds.width / 2.0, centre.y / 2.0),
        &paints.time,
    );

    let date = format_date(&state.current_time);
    let date_bounds = renderer.measure_text(&date, &paints.date);
    renderer.draw_text(
        &date,
        Point::new(
            centre.x - date_bounds.width / 2.0,
            centre.y - 1.5 * date_bounds.height,
        ),
        &paints.date,
    );

    renderer.draw_line(
        Point::new(centre.x - DIVIDER_HALF_WIDTH, centre.y),
        Point::new(centre.x + DIVIDER_HALF_WIDTH, centre.y),
        &paints.time,
    );

    if ambient {
        return FrameOutcome::default();
    }

    let outcome = draw_weather_row(renderer, weather, paints, centre);

    if degraded {
        renderer.draw_indicator(
            Indicator::ConnectivityDegraded,
            Point::new(centre.x, bounds.height - DIVIDER_HALF_WIDTH),
        );
    }

    outcome
}

fn draw_weather_row<R: Renderer>(
    renderer: &mut R,
    weather: &WeatherSnapshot,
    paints: &Paints,
    centre: Point,
) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();
    let mut x = centre.x - centre.x / 2.0;
    let y = centre.y + WEATHER_ROW_GAP;

    if let Some(icon) = weather.icon {
        match renderer.draw_icon(icon, Point::new(x, y), paints.icon_size) {
            Ok(width) => {
                x += width + ICON_SPACING;
                outcome.weather_drawn = true;
            }
            Err(e) => {
                warn!("Frame: {:?} icon skipped: {}", icon, e);
                outcome.icon_missing = true;
            }
        }
    }

    if let Some(high) = weather.high_temp.as_deref() {
        renderer.draw_text(high, Point::new(x, y + TEMPERATURE_BASELINE), &paints.temperature);
        x += renderer.measure_text(high, &paints.temperature).width + TEMPERATURE_SPACING;
        outcome.weather_drawn = true;
    }

    if let Some(low) = weather.low_temp.as_deref() {
        renderer.draw_text(low, Point::new(x, y + TEMPERATURE_BASELINE), &paints.temperature);
        outcome.weather_drawn = true;
    }

    debug!("Frame: weather row {:?}", outcome);
    outcome
}
