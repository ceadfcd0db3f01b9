//! Outbound face events.
//!
//! The [`FaceEngine`](super::engine::FaceEngine) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::connectivity::ConnectionState;
use crate::fsm::FaceState;
use crate::sync::WeatherSnapshot;

/// Structured events emitted by the face core.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceEvent {
    /// The engine finished `on_create` (carries initial state).
    Created(FaceState),

    /// The visibility/ambient state machine moved.
    StateChanged { from: FaceState, to: FaceState },

    /// The connectivity session moved.
    ConnectivityChanged {
        from: ConnectionState,
        to: ConnectionState,
    },

    /// A new weather snapshot replaced the current one.
    WeatherUpdated(WeatherSnapshot),

    /// A frame was drawn.
    FrameDrawn { ambient: bool, weather_drawn: bool },

    /// The engine was torn down.
    Destroyed,
}
