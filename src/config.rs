//! Watch-face configuration parameters
//!
//! All tunable parameters for the face: redraw cadence, theme colours,
//! per-shape dimension sets, and the connectivity retry policy.
//! Values can be overridden from a JSON file via [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Core face configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    // --- Timing ---
    /// Redraw interval while visible and interactive (milliseconds)
    pub interactive_update_rate_ms: u32,

    // --- Theme ---
    /// Interactive background fill
    pub background_colour: Rgb,
    /// Time, date and temperature text colour
    pub text_colour: Rgb,

    // --- Layout ---
    /// Dimension set for round displays
    pub round: Dimensions,
    /// Dimension set for rectangular displays
    pub rectangular: Dimensions,

    // --- Connectivity ---
    /// Reconnect policy after a failed or suspended session
    pub retry: RetryPolicy,
}

/// Per-shape text sizes (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub time_text_size: f32,
    pub date_text_size: f32,
    pub temperature_text_size: f32,
}

/// Exponential backoff with jitter for reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before the first retry (milliseconds)
    pub base_delay_ms: u32,
    /// Upper bound on any single delay (milliseconds)
    pub max_delay_ms: u32,
    /// Retries allowed before the session is declared failed
    pub max_attempts: u8,
    /// Random spread applied to each delay, as a percentage (0-100)
    pub jitter_percent: u8,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            interactive_update_rate_ms: 1000, // 1 Hz

            background_colour: (0x03, 0xA9, 0xF4),
            text_colour: (0xE1, 0xF5, 0xFE),

            round: Dimensions {
                time_text_size: 45.0,
                date_text_size: 18.0,
                temperature_text_size: 22.0,
            },
            rectangular: Dimensions {
                time_text_size: 40.0,
                date_text_size: 16.0,
                temperature_text_size: 20.0,
            },

            retry: RetryPolicy::default(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: 5,
            jitter_percent: 20,
        }
    }
}

impl Dimensions {
    fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            self.time_text_size,
            self.date_text_size,
            self.temperature_text_size,
        ];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::ValidationFailed("text sizes must be positive"));
        }
        Ok(())
    }
}

impl FaceConfig {
    /// Reject values that would stall the timer or break layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interactive_update_rate_ms == 0 {
            return Err(ConfigError::ValidationFailed("update rate must be > 0"));
        }
        if self.interactive_update_rate_ms > 60_000 {
            return Err(ConfigError::ValidationFailed("update rate must be <= 60s"));
        }
        self.round.validate()?;
        self.rectangular.validate()?;

        let r = &self.retry;
        if r.base_delay_ms == 0 {
            return Err(ConfigError::ValidationFailed("retry base delay must be > 0"));
        }
        if r.max_delay_ms < r.base_delay_ms {
            return Err(ConfigError::ValidationFailed("retry max delay below base delay"));
        }
        if r.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed("retry attempts must be >= 1"));
        }
        if r.jitter_percent > 100 {
            return Err(ConfigError::ValidationFailed("jitter must be 0-100%"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.  Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}
