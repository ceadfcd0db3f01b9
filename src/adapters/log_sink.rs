//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured face events to the `log`
//! facade (stderr via `env_logger` in the demo binary).  A debug overlay
//! or telemetry forwarder would implement the same trait.

use log::{debug, info};

use crate::app::events::FaceEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FaceEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self { emitted: 0 }
    }

    /// Events seen so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FaceEvent) {
        self.emitted += 1;
        match event {
            FaceEvent::Created(state) => {
                info!("START | initial_state={:?}", state);
            }
            FaceEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            FaceEvent::ConnectivityChanged { from, to } => {
                info!("LINK  | {:?} -> {:?}", from, to);
            }
            FaceEvent::WeatherUpdated(w) => {
                info!(
                    "WEATH | high={} low={} icon={:?}",
                    w.high_temp.as_deref().unwrap_or("-"),
                    w.low_temp.as_deref().unwrap_or("-"),
                    w.icon,
                );
            }
            FaceEvent::FrameDrawn {
                ambient,
                weather_drawn,
            } => {
                // Once per second while interactive; keep it out of info.
                debug!("FRAME | ambient={} weather={}", ambient, weather_drawn);
            }
            FaceEvent::Destroyed => {
                info!("STOP  | face destroyed");
            }
        }
    }
}
