//! Mock port adapters for integration tests.
//!
//! Each mock records what the engine asked of it so tests can assert on
//! the full call history without a display, radio or wall clock.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::FixedOffset;
use sunface::app::engine::FaceEngine;
use sunface::app::events::FaceEvent;
use sunface::app::ports::{
    ClockPort, ConnectionEvent, DataListener, EventSink, Transport, TransportError,
};
use sunface::adapters::recording_renderer::RecordingRenderer;
use sunface::config::{FaceConfig, RetryPolicy};
use sunface::sync::data::{DataEvent, DataItem};
use sunface::sync::icons::WeatherIconTable;

// ── MockTransport ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCall {
    Connect,
    Disconnect,
    AddListener,
    RemoveListener,
    Put,
}

#[derive(Default)]
pub struct MockTransport {
    pub calls: Vec<TransportCall>,
    pub published: Vec<DataItem>,
    pub listener: Option<Arc<dyn DataListener>>,
    pub connected: bool,
    /// Connect attempts that fail before one succeeds.
    pub fail_connects: u32,
    pub events: VecDeque<ConnectionEvent>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(n: u32) -> Self {
        Self {
            fail_connects: n,
            ..Self::default()
        }
    }

    pub fn count(&self, call: TransportCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// Deliver `events` to the registered listener, as the transport's
    /// callback context would.  Returns `false` if nobody is listening.
    pub fn deliver(&self, events: &[DataEvent]) -> bool {
        match &self.listener {
            Some(l) => {
                l.on_data_changed(events);
                true
            }
            None => false,
        }
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        self.calls.push(TransportCall::Connect);
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            return Err(TransportError::ConnectionFailed);
        }
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.calls.push(TransportCall::Disconnect);
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn add_listener(&mut self, listener: Arc<dyn DataListener>) -> Result<(), TransportError> {
        self.calls.push(TransportCall::AddListener);
        self.listener = Some(listener);
        Ok(())
    }

    fn remove_listener(&mut self) {
        self.calls.push(TransportCall::RemoveListener);
        self.listener = None;
    }

    fn put_data_item(&mut self, item: DataItem) -> Result<(), TransportError> {
        self.calls.push(TransportCall::Put);
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.published.push(item);
        Ok(())
    }

    fn poll_connection_event(&mut self) -> Option<ConnectionEvent> {
        self.events.pop_front()
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub now: i64,
    pub offset: FixedOffset,
    pub watch_calls: u32,
    pub unwatch_calls: u32,
}

impl MockClock {
    pub fn at(now: i64) -> Self {
        Self {
            now,
            offset: FixedOffset::east_opt(0).unwrap(),
            watch_calls: 0,
            unwatch_calls: 0,
        }
    }
}

impl ClockPort for MockClock {
    fn now_millis(&self) -> i64 {
        self.now
    }

    fn utc_offset(&self) -> FixedOffset {
        self.offset
    }

    fn watch_time_zone(&mut self) {
        self.watch_calls += 1;
    }

    fn unwatch_time_zone(&mut self) {
        self.unwatch_calls += 1;
    }
}

// ── VecSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<FaceEvent>,
}

#[allow(dead_code)]
impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> impl Iterator<Item = (bool, bool)> + '_ {
        self.events.iter().filter_map(|e| match e {
            FaceEvent::FrameDrawn {
                ambient,
                weather_drawn,
            } => Some((*ambient, *weather_drawn)),
            _ => None,
        })
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &FaceEvent) {
        self.events.push(event.clone());
    }
}

// ── Engine fixture ────────────────────────────────────────────

pub type TestEngine = FaceEngine<RecordingRenderer, MockTransport, MockClock>;

/// 2024-03-16 09:05:42.300 UTC.
pub const T0: i64 = 1_710_579_942_300;

/// Deterministic retries: no jitter, 1 s doubling to 4 s, three attempts.
pub fn test_config() -> FaceConfig {
    FaceConfig {
        retry: RetryPolicy {
            base_delay_ms: 1_000,
            max_delay_ms: 4_000,
            max_attempts: 3,
            jitter_percent: 0,
        },
        ..FaceConfig::default()
    }
}

/// Created (hidden) engine over `transport`.
pub fn engine_with(transport: MockTransport) -> (TestEngine, VecSink) {
    let mut sink = VecSink::new();
    let mut engine = FaceEngine::new(
        test_config(),
        RecordingRenderer::new(),
        transport,
        MockClock::at(T0),
        WeatherIconTable,
    )
    .expect("test config validates");
    engine.on_create(&mut sink);
    (engine, sink)
}

pub fn engine() -> (TestEngine, VecSink) {
    engine_with(MockTransport::new())
}
