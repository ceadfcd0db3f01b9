//! Port traits: the hexagonal boundary between the face core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FaceEngine (domain)
//! ```
//!
//! Driven adapters (display, inter-device transport, clock, event sinks,
//! config storage) implement these traits.  The
//! [`FaceEngine`](super::engine::FaceEngine) consumes them via generics, so
//! the core never touches a real display or radio and runs headless in tests.
//!
//! ## Threading notes
//!
//! - **DataListener** callbacks run on the transport's own context, never on
//!   the render loop.  Implementations must be `Send + Sync` and must not
//!   block waiting on a draw.
//! - Every other port is called only from the render loop.

use std::sync::Arc;

use crate::config::{FaceConfig, Rgb};
use crate::render::{Indicator, Point, TextBounds, TextStyle};
use crate::sync::data::{DataEvent, DataItem};
use crate::sync::icons::IconId;

// ───────────────────────────────────────────────────────────────
// Renderer port (driven adapter: domain → display)
// ───────────────────────────────────────────────────────────────

/// Drawing surface for one frame.
///
/// Calls arrive in paint order between the engine's `draw` entry and exit.
pub trait Renderer {
    /// Fill the whole surface with a solid colour.
    fn fill_background(&mut self, colour: Rgb);

    /// Measure `text` as it would be drawn with `style`.
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextBounds;

    /// Draw `text` with its baseline-left corner at `at`.
    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Draw a straight line using the colour and anti-alias flag of `style`.
    fn draw_line(&mut self, from: Point, to: Point, style: &TextStyle);

    /// Draw a square weather icon of side `size` with its top-left at `at`.
    /// Returns the drawn width so the caller can advance its cursor.
    fn draw_icon(&mut self, icon: IconId, at: Point, size: f32) -> Result<f32, RenderError>;

    /// Draw a small status marker (e.g. connectivity degraded).
    fn draw_indicator(&mut self, indicator: Indicator, at: Point);
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain ↔ companion device)
// ───────────────────────────────────────────────────────────────

/// Receives pushed data items.  Invoked from the transport's context.
pub trait DataListener: Send + Sync {
    fn on_data_changed(&self, events: &[DataEvent]);
}

/// Asynchronous session notifications raised by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The session (re)connected without an explicit `connect` call.
    Connected,
    /// The session dropped temporarily; the transport may come back.
    Suspended,
    /// The session failed and will not recover by itself.
    Failed,
}

/// Session-oriented pub/sub transport to the paired companion.
pub trait Transport {
    /// Establish a session.  `Ok` means the session is usable now.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Tear the session down.  Must be a safe no-op when already disconnected.
    fn disconnect(&mut self);

    /// Whether a session is currently established.
    fn is_connected(&self) -> bool;

    /// Register the single data listener for pushed items.
    fn add_listener(&mut self, listener: Arc<dyn DataListener>) -> Result<(), TransportError>;

    /// Remove the data listener.  No-op if none is registered.
    fn remove_listener(&mut self);

    /// Publish a data item to the companion.  Fire-and-forget.
    fn put_data_item(&mut self, item: DataItem) -> Result<(), TransportError>;

    /// Next pending session notification, if any.  Called from the render loop.
    fn poll_connection_event(&mut self) -> Option<ConnectionEvent> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: system clock → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock time source plus the time-zone change observer.
pub trait ClockPort {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Current local UTC offset.
    fn utc_offset(&self) -> chrono::FixedOffset;

    /// Start delivering time-zone change notifications.
    fn watch_time_zone(&mut self);

    /// Stop delivering time-zone change notifications.
    fn unwatch_time_zone(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Icon lookup port (external resource table)
// ───────────────────────────────────────────────────────────────

/// Maps a weather condition code to an icon handle.
pub trait IconLookup: Send + Sync {
    /// `None` when the code has no associated art.
    fn icon_for_condition(&self, weather_id: i32) -> Option<IconId>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The engine emits structured [`FaceEvent`](super::events::FaceEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::FaceEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads face configuration.
///
/// Implementations MUST validate before returning; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Returns [`FaceConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<FaceConfig, ConfigError>;

    /// Persist `config`.  Validates first; an invalid config is not written.
    fn save(&self, config: &FaceConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`Transport`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Operation requires an established session.
    NotConnected,
    /// The session could not be established.
    ConnectionFailed,
    /// A data item could not be queued for delivery.
    PublishFailed,
}

/// Errors from [`Renderer`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The icon resource could not be resolved.
    IconNotFound,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::ConnectionFailed => write!(f, "connection failed"),
            Self::PublishFailed => write!(f, "publish failed"),
        }
    }
}

impl core::fmt::Display for RenderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IconNotFound => write!(f, "icon resource not found"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
