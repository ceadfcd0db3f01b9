//! Connectivity channel: session lifecycle with the companion transport.
//!
//! ```text
//!            open()                 connect Ok
//! Disconnected ──▶ Connecting ─────────────────▶ Connected ──▶ add_listener
//!      ▲               │ connect Err                 │          + weather request
//!      │               ▼                             │ Suspended event
//!      │            Failed ◀── budget spent ── Suspended
//!      │               │  retry_at reached           │ retry_at reached
//!      │               └────────▶ Connecting ◀───────┘
//!      └──────────── close(): remove_listener, disconnect (any state)
//! ```
//!
//! Listener registration is guarded by a flag, so repeated registration
//! requests never duplicate the listener on the transport.  Retry timing is
//! driven by the render loop through [`ConnectivityChannel::poll`]; the
//! channel itself never sleeps or spawns.

use std::sync::Arc;

use log::{info, warn};

use crate::app::ports::{ConnectionEvent, DataListener, Transport};
use crate::config::RetryPolicy;

use super::{Backoff, CompanionNotifier, ConnectionState};

pub struct ConnectivityChannel<T: Transport> {
    transport: T,
    listener: Arc<dyn DataListener>,
    notifier: CompanionNotifier,
    state: ConnectionState,
    listener_registered: bool,
    /// The face wants a session (set by `open`, cleared by `close`).
    open_requested: bool,
    backoff: Backoff,
    /// Absolute time (epoch ms) of the next reconnect attempt.
    retry_at: Option<i64>,
}

impl<T: Transport> ConnectivityChannel<T> {
    pub fn new(transport: T, listener: Arc<dyn DataListener>, policy: RetryPolicy) -> Self {
        Self::with_backoff(transport, listener, Backoff::new(policy))
    }

    pub fn with_backoff(transport: T, listener: Arc<dyn DataListener>, backoff: Backoff) -> Self {
        Self {
            transport,
            listener,
            notifier: CompanionNotifier::new(),
            state: ConnectionState::Disconnected,
            listener_registered: false,
            open_requested: false,
            backoff,
            retry_at: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Request a session.  Connects immediately unless already connected.
    pub fn open(&mut self, now_ms: i64) {
        self.open_requested = true;
        if self.state == ConnectionState::Connected {
            return;
        }
        self.backoff.reset();
        self.retry_at = None;
        self.attempt_connect(now_ms);
    }

    /// Drop the session: unregister the listener, then disconnect,
    /// whatever the current state.  Cancels pending retries.
    pub fn close(&mut self) {
        self.open_requested = false;
        self.retry_at = None;
        self.unregister_listener();
        self.transport.disconnect();
        if self.state != ConnectionState::Disconnected {
            info!("Channel: {:?} -> Disconnected", self.state);
        }
        self.state = ConnectionState::Disconnected;
        self.backoff.reset();
    }

    /// Drain transport notifications and run a due reconnect attempt.
    pub fn poll(&mut self, now_ms: i64) {
        while let Some(event) = self.transport.poll_connection_event() {
            self.handle_event(event, now_ms);
        }

        match self.retry_at {
            Some(at) if now_ms >= at && self.open_requested => {
                self.retry_at = None;
                info!(
                    "Channel: reconnect attempt {}/{}",
                    self.backoff.attempts(),
                    self.backoff.policy().max_attempts
                );
                self.attempt_connect(now_ms);
            }
            _ => {}
        }
    }

    // ── Listener registration ─────────────────────────────────

    /// Register the data listener.  Idempotent.
    pub fn register_listener(&mut self) {
        if self.listener_registered {
            return;
        }
        match self.transport.add_listener(Arc::clone(&self.listener)) {
            Ok(()) => self.listener_registered = true,
            Err(e) => warn!("Channel: listener registration failed: {}", e),
        }
    }

    /// Unregister the data listener.  Idempotent.
    pub fn unregister_listener(&mut self) {
        if !self.listener_registered {
            return;
        }
        self.transport.remove_listener();
        self.listener_registered = false;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_degraded(&self) -> bool {
        self.state.is_degraded()
    }

    pub fn listener_registered(&self) -> bool {
        self.listener_registered
    }

    /// Absolute time of the next reconnect attempt, if one is scheduled.
    pub fn next_deadline(&self) -> Option<i64> {
        self.retry_at
    }

    pub fn weather_requests_sent(&self) -> u32 {
        self.notifier.requests_sent()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // ── Internal ──────────────────────────────────────────────

    fn attempt_connect(&mut self, now_ms: i64) {
        self.state = ConnectionState::Connecting;
        match self.transport.connect() {
            Ok(()) => self.on_connected(),
            Err(e) => {
                warn!("Channel: connection failed: {}", e);
                self.state = ConnectionState::Failed;
                self.schedule_retry(now_ms);
            }
        }
    }

    fn on_connected(&mut self) {
        info!("Channel: connected");
        self.state = ConnectionState::Connected;
        self.backoff.reset();
        self.retry_at = None;
        self.register_listener();
        // Fire-and-forget; failures are logged by the notifier.
        let _ = self.notifier.request_weather(&mut self.transport);
    }

    fn handle_event(&mut self, event: ConnectionEvent, now_ms: i64) {
        if !self.open_requested {
            return;
        }
        match event {
            ConnectionEvent::Connected => {
                if self.state != ConnectionState::Connected {
                    self.on_connected();
                }
            }
            ConnectionEvent::Suspended => {
                warn!("Channel: connection suspended");
                self.state = ConnectionState::Suspended;
                self.schedule_retry(now_ms);
            }
            ConnectionEvent::Failed => {
                warn!("Channel: connection failed (transport)");
                self.state = ConnectionState::Failed;
                self.schedule_retry(now_ms);
            }
        }
    }

    fn schedule_retry(&mut self, now_ms: i64) {
        match self.backoff.next_delay_ms() {
            Some(delay) => {
                self.retry_at = Some(now_ms + i64::from(delay));
                info!("Channel: retry in {} ms", delay);
            }
            None => {
                self.retry_at = None;
                self.state = ConnectionState::Failed;
                warn!("Channel: retry budget exhausted, connectivity degraded");
            }
        }
    }
}
