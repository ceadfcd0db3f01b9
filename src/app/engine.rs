//! Face engine, the hexagonal core.
//!
//! [`FaceEngine`] owns the render state, the redraw timer, the connectivity
//! channel and the current weather snapshot.  Platform lifecycle callbacks
//! arrive as method calls; all I/O flows through port traits, so the whole
//! engine runs headless against mock adapters.
//!
//! ```text
//!   ClockPort ──▶ ┌──────────────────────────────┐ ──▶ Renderer
//!                 │          FaceEngine           │
//!   Transport ◀──▶│ FSM · TickTimer · Channel     │ ──▶ EventSink
//!                 └──────────────┬───────────────┘
//!                                │ take()
//!   DataSyncAdapter ──publish──▶ SnapshotSlot
//! ```
//!
//! The engine is driven cooperatively: the host calls [`FaceEngine::poll`]
//! and sleeps until the returned deadline (or until a lifecycle callback).
//! Snapshots are drained on every poll even while hidden, but frames are
//! only drawn while visible.

use std::sync::Arc;

use log::{debug, info};

use crate::config::FaceConfig;
use crate::connectivity::{ConnectionState, ConnectivityChannel};
use crate::fsm::context::RenderState;
use crate::fsm::{self, FaceInput, FaceState, Transition};
use crate::render::{draw_frame, FrameBounds, Layout, Paints, Shape};
use crate::sync::{DataSyncAdapter, SnapshotSlot, WeatherSnapshot};
use crate::timer::TickTimer;

use super::events::FaceEvent;
use super::ports::{ClockPort, DataListener, EventSink, IconLookup, Renderer, Transport};

/// Surface size assumed until the platform reports one.
pub const DEFAULT_BOUNDS: FrameBounds = FrameBounds::new(320.0, 320.0);

// ───────────────────────────────────────────────────────────────
// FaceEngine
// ───────────────────────────────────────────────────────────────

pub struct FaceEngine<R: Renderer, T: Transport, C: ClockPort> {
    config: FaceConfig,
    renderer: R,
    clock: C,
    channel: ConnectivityChannel<T>,
    slot: Arc<SnapshotSlot>,

    state: RenderState,
    weather: WeatherSnapshot,
    layout: Layout,
    paints: Paints,
    bounds: FrameBounds,
    timer: TickTimer,

    time_zone_registered: bool,
    invalidated: bool,
    last_connection: ConnectionState,
    frames_drawn: u64,
}

impl<R: Renderer, T: Transport, C: ClockPort> FaceEngine<R, T, C> {
    /// Wire the engine to its ports.  `icons` resolves condition codes for
    /// the data-sync listener that the channel registers on the transport.
    ///
    /// Does **not** run the create hook; call [`on_create`](Self::on_create) next.
    ///
    /// Fails with [`Error::Config`](crate::Error::Config) when `config` does
    /// not validate.
    pub fn new(
        config: FaceConfig,
        renderer: R,
        transport: T,
        clock: C,
        icons: impl IconLookup + 'static,
    ) -> crate::Result<Self> {
        config.validate()?;
        let slot = Arc::new(SnapshotSlot::new());
        let listener: Arc<dyn DataListener> =
            Arc::new(DataSyncAdapter::new(Arc::clone(&slot), icons));
        let channel = ConnectivityChannel::new(transport, listener, config.retry);
        let layout = Layout::for_shape(Shape::default(), &config);
        let paints = Paints::new(&config, &layout);
        let timer = TickTimer::new(config.interactive_update_rate_ms);

        Ok(Self {
            config,
            renderer,
            clock,
            channel,
            slot,
            state: RenderState::new(),
            weather: WeatherSnapshot::UNSET,
            layout,
            paints,
            bounds: DEFAULT_BOUNDS,
            timer,
            time_zone_registered: false,
            invalidated: false,
            last_connection: ConnectionState::Disconnected,
            frames_drawn: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Allocate paints and reset render state to hidden/interactive.
    pub fn on_create(&mut self, sink: &mut impl EventSink) {
        self.state = RenderState::new();
        self.paints = Paints::new(&self.config, &self.layout);
        self.refresh_clock();
        let initial = FaceState::of(&self.state);
        sink.emit(&FaceEvent::Created(initial));
        info!("FaceEngine created in {:?}", initial);
    }

    /// Device capability flags.
    pub fn on_properties_changed(&mut self, low_bit_ambient: bool) {
        self.state.low_bit_ambient = low_bit_ambient;
        self.paints.set_anti_alias(self.state.text_anti_alias());
        debug!("FaceEngine: low_bit_ambient={}", low_bit_ambient);
    }

    pub fn on_visibility_changed(&mut self, visible: bool, sink: &mut impl EventSink) {
        let now = self.clock.now_millis();
        let transition = fsm::apply(&mut self.state, FaceInput::visibility(visible));

        if visible {
            self.register_time_zone();
            self.refresh_clock();
            self.channel.open(now);
            // Ambient never starts the timer; the first frame must not wait for it.
            self.invalidate();
        } else {
            self.unregister_time_zone();
            self.channel.close();
            self.invalidated = false;
        }

        Self::emit_transition(transition, sink);
        self.sync_connectivity(sink);
        self.update_timer(now);
    }

    pub fn on_ambient_mode_changed(&mut self, in_ambient: bool, sink: &mut impl EventSink) {
        let transition = fsm::apply(&mut self.state, FaceInput::ambient(in_ambient));
        if self.state.low_bit_ambient {
            self.paints.set_anti_alias(self.state.text_anti_alias());
        }
        Self::emit_transition(transition, sink);
        self.invalidate();
        self.update_timer(self.clock.now_millis());
    }

    /// Recompute layout for the display outline.
    pub fn on_apply_window_insets(&mut self, shape: Shape) {
        self.layout = Layout::for_shape(shape, &self.config);
        self.paints.apply_layout(&self.layout);
        debug!("FaceEngine: layout for {:?}", shape);
    }

    pub fn on_surface_changed(&mut self, bounds: FrameBounds) {
        self.bounds = bounds;
        self.invalidate();
    }

    /// Platform minute tick (delivered in ambient mode).
    pub fn on_time_tick(&mut self) {
        self.invalidate();
    }

    pub fn on_time_zone_changed(&mut self) {
        self.refresh_clock();
        self.invalidate();
        info!("FaceEngine: time zone now {}", self.clock.utc_offset());
    }

    pub fn on_destroy(&mut self, sink: &mut impl EventSink) {
        self.timer.cancel();
        self.unregister_time_zone();
        self.channel.close();
        self.sync_connectivity(sink);
        self.invalidated = false;
        sink.emit(&FaceEvent::Destroyed);
        info!("FaceEngine destroyed");
    }

    /// Schedule a redraw on the next poll.  Ignored while hidden.
    pub fn invalidate(&mut self) {
        if self.state.visible {
            self.invalidated = true;
        }
    }

    // ── Cooperative loop ──────────────────────────────────────

    /// One loop iteration: connectivity, snapshot drain, timer, draw.
    ///
    /// Returns the earliest time the engine next needs a poll, if any.
    pub fn poll(&mut self, now_ms: i64, sink: &mut impl EventSink) -> Option<i64> {
        self.channel.poll(now_ms);
        self.sync_connectivity(sink);

        if let Some(snapshot) = self.slot.take() {
            info!("FaceEngine: weather updated {:?}", snapshot);
            sink.emit(&FaceEvent::WeatherUpdated(snapshot.clone()));
            self.weather = snapshot;
        }
        if self.slot.take_redraw_request() {
            self.invalidate();
        }

        if self.timer.poll(now_ms) {
            self.invalidate();
        }

        if self.invalidated {
            self.draw(self.bounds, sink);
        }

        self.next_deadline()
    }

    /// Draw one frame into `bounds`.  Returns `false` (and draws nothing)
    /// while hidden.
    pub fn draw(&mut self, bounds: FrameBounds, sink: &mut impl EventSink) -> bool {
        if !self.state.visible {
            return false;
        }
        self.bounds = bounds;
        self.refresh_clock();

        let outcome = draw_frame(
            &mut self.renderer,
            &self.state,
            &self.weather,
            &self.paints,
            bounds,
            self.channel.is_degraded(),
        );

        self.invalidated = false;
        self.frames_drawn += 1;
        sink.emit(&FaceEvent::FrameDrawn {
            ambient: self.state.is_ambient(),
            weather_drawn: outcome.weather_drawn,
        });
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> FaceState {
        FaceState::of(&self.state)
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// The snapshot the next frame will render.
    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn is_redraw_scheduled(&self) -> bool {
        self.invalidated
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.channel.state()
    }

    pub fn connectivity_degraded(&self) -> bool {
        self.channel.is_degraded()
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn paints(&self) -> &Paints {
        &self.paints
    }

    pub fn time_zone_registered(&self) -> bool {
        self.time_zone_registered
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Handoff slot written by the data-sync listener.
    pub fn snapshot_slot(&self) -> Arc<SnapshotSlot> {
        Arc::clone(&self.slot)
    }

    pub fn channel(&self) -> &ConnectivityChannel<T> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut ConnectivityChannel<T> {
        &mut self.channel
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ── Internal ──────────────────────────────────────────────

    fn next_deadline(&self) -> Option<i64> {
        match (self.timer.deadline(), self.channel.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn update_timer(&mut self, now_ms: i64) {
        if self.state().timer_should_run() {
            if !self.timer.is_running() {
                self.timer.start(now_ms);
            }
        } else {
            self.timer.cancel();
        }
    }

    fn refresh_clock(&mut self) {
        let now = self.clock.now_millis();
        self.state.refresh_time(now, self.clock.utc_offset());
    }

    fn register_time_zone(&mut self) {
        if self.time_zone_registered {
            return;
        }
        self.time_zone_registered = true;
        self.clock.watch_time_zone();
    }

    fn unregister_time_zone(&mut self) {
        if !self.time_zone_registered {
            return;
        }
        self.time_zone_registered = false;
        self.clock.unwatch_time_zone();
    }

    fn emit_transition(transition: Option<Transition>, sink: &mut impl EventSink) {
        if let Some(Transition { from, to }) = transition {
            sink.emit(&FaceEvent::StateChanged { from, to });
        }
    }

    /// Report session changes; a change in the degraded indicator needs a frame.
    fn sync_connectivity(&mut self, sink: &mut impl EventSink) {
        let current = self.channel.state();
        if current == self.last_connection {
            return;
        }
        let from = self.last_connection;
        self.last_connection = current;
        sink.emit(&FaceEvent::ConnectivityChanged { from, to: current });
        if from.is_degraded() != current.is_degraded() {
            self.invalidate();
        }
    }
}
