//! In-process loopback transport.
//!
//! Implements [`Transport`] for headless runs: the watch side and a
//! [`LoopbackCompanion`] handle share one link.  Data pushed by the
//! companion is delivered to the registered listener from a dedicated
//! delivery thread, so listener callbacks never run on the render loop.
//!
//! ```text
//!   watch ── put_data_item ──▶ flume ──▶ LoopbackCompanion::next_request
//!   LoopbackCompanion::push ──▶ flume ──▶ [delivery thread] ──▶ DataListener
//!   LoopbackCompanion::suspend ──▶ embassy Channel ──▶ poll_connection_event
//! ```

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::app::ports::{ConnectionEvent, DataListener, Transport, TransportError};
use crate::sync::data::{DataEvent, DataItem};

/// Pending session notifications the render loop has not drained yet.
const EVENT_QUEUE_DEPTH: usize = 8;

type ListenerCell = Mutex<CriticalSectionRawMutex, RefCell<Option<Arc<dyn DataListener>>>>;

enum Delivery {
    Events(Vec<DataEvent>),
    Shutdown,
}

/// State visible to both ends and the delivery thread.
struct Link {
    listener: ListenerCell,
    connection_events: Channel<CriticalSectionRawMutex, ConnectionEvent, EVENT_QUEUE_DEPTH>,
    /// Companion reachable; `connect` fails while down.
    up: AtomicBool,
    /// Watch side holds a session.
    connected: AtomicBool,
    /// Upcoming `connect` calls that fail regardless of `up`.
    failing_connects: AtomicU32,
}

impl Link {
    fn listener(&self) -> Option<Arc<dyn DataListener>> {
        self.listener.lock(|cell| cell.borrow().clone())
    }

    fn raise(&self, event: ConnectionEvent) {
        if self.connection_events.try_send(event).is_err() {
            warn!("Loopback: connection event queue full, dropping {:?}", event);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Watch side
// ───────────────────────────────────────────────────────────────

pub struct LoopbackTransport {
    link: Arc<Link>,
    to_companion: flume::Sender<DataItem>,
    deliveries: flume::Sender<Delivery>,
    delivery_thread: Option<JoinHandle<()>>,
}

impl LoopbackTransport {
    /// Create a connected pair and start the delivery thread.
    pub fn pair() -> std::io::Result<(Self, LoopbackCompanion)> {
        let link = Arc::new(Link {
            listener: Mutex::new(RefCell::new(None)),
            connection_events: Channel::new(),
            up: AtomicBool::new(true),
            connected: AtomicBool::new(false),
            failing_connects: AtomicU32::new(0),
        });
        let (to_companion, from_watch) = flume::unbounded();
        let (deliveries, delivery_rx) = flume::unbounded();

        let thread_link = Arc::clone(&link);
        let delivery_thread = std::thread::Builder::new()
            .name("loopback-delivery".into())
            .spawn(move || deliver(&thread_link, &delivery_rx))?;

        let companion = LoopbackCompanion {
            link: Arc::clone(&link),
            from_watch,
            deliveries: deliveries.clone(),
        };
        let transport = Self {
            link,
            to_companion,
            deliveries,
            delivery_thread: Some(delivery_thread),
        };
        Ok((transport, companion))
    }
}

fn deliver(link: &Link, rx: &flume::Receiver<Delivery>) {
    while let Ok(delivery) = rx.recv() {
        match delivery {
            Delivery::Shutdown => break,
            Delivery::Events(events) => {
                if !link.connected.load(Ordering::Acquire) {
                    debug!("Loopback: {} events dropped, no session", events.len());
                    continue;
                }
                match link.listener() {
                    Some(listener) => listener.on_data_changed(&events),
                    None => debug!("Loopback: {} events dropped, no listener", events.len()),
                }
            }
        }
    }
}

impl Transport for LoopbackTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        let forced_failure = self
            .link
            .failing_connects
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok();
        if forced_failure || !self.link.up.load(Ordering::Acquire) {
            return Err(TransportError::ConnectionFailed);
        }
        self.link.connected.store(true, Ordering::Release);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.link.connected.store(false, Ordering::Release);
    }

    fn is_connected(&self) -> bool {
        self.link.connected.load(Ordering::Acquire)
    }

    fn add_listener(&mut self, listener: Arc<dyn DataListener>) -> Result<(), TransportError> {
        self.link.listener.lock(|cell| *cell.borrow_mut() = Some(listener));
        Ok(())
    }

    fn remove_listener(&mut self) {
        self.link.listener.lock(|cell| *cell.borrow_mut() = None);
    }

    fn put_data_item(&mut self, item: DataItem) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.to_companion
            .send(item)
            .map_err(|_| TransportError::PublishFailed)
    }

    fn poll_connection_event(&mut self) -> Option<ConnectionEvent> {
        self.link.connection_events.try_receive().ok()
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        let _ = self.deliveries.send(Delivery::Shutdown);
        if let Some(handle) = self.delivery_thread.take() {
            if handle.join().is_err() {
                warn!("Loopback: delivery thread panicked");
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Companion side
// ───────────────────────────────────────────────────────────────

/// The phone's end of the loopback link.  Cloneable and `Send`.
#[derive(Clone)]
pub struct LoopbackCompanion {
    link: Arc<Link>,
    from_watch: flume::Receiver<DataItem>,
    deliveries: flume::Sender<Delivery>,
}

impl LoopbackCompanion {
    /// Push changed items to the watch.  Delivered as one batch.
    pub fn push(&self, items: Vec<DataItem>) {
        let events = items.into_iter().map(DataEvent::changed).collect();
        self.send(events);
    }

    /// Push a deletion for `path`.
    pub fn delete(&self, path: &str) {
        self.send(vec![DataEvent::deleted(path)]);
    }

    fn send(&self, events: Vec<DataEvent>) {
        if self.deliveries.send(Delivery::Events(events)).is_err() {
            warn!("Loopback: watch side gone, push dropped");
        }
    }

    /// Next item published by the watch, waiting up to `timeout`.
    pub fn next_request(&self, timeout: Duration) -> Option<DataItem> {
        self.from_watch.recv_timeout(timeout).ok()
    }

    /// Drop the link: the session is suspended and reconnects fail until
    /// [`restore`](Self::restore).
    pub fn suspend(&self) {
        self.link.up.store(false, Ordering::Release);
        self.link.connected.store(false, Ordering::Release);
        self.link.raise(ConnectionEvent::Suspended);
    }

    pub fn restore(&self) {
        self.link.up.store(true, Ordering::Release);
    }

    /// Make the next `n` connect attempts fail.
    pub fn fail_next_connects(&self, n: u32) {
        self.link.failing_connects.store(n, Ordering::Release);
    }

    pub fn watch_connected(&self) -> bool {
        self.link.connected.load(Ordering::Acquire)
    }

    pub fn watch_listening(&self) -> bool {
        self.link.listener().is_some()
    }
}
