//! Single-slot snapshot handoff between the sync path and the render loop.
//!
//! ```text
//! ┌──────────────────┐  publish(snapshot)  ┌──────────┐  take()  ┌─────────────┐
//! │ DataSyncAdapter  │────────────────────▶│  Signal  │─────────▶│ FaceEngine  │
//! │ (transport ctx)  │  request_redraw()   │ (1 slot) │          │ (render ctx)│
//! └──────────────────┘────────────────────▶│ AtomicBool│────────▶└─────────────┘
//! ```
//!
//! The slot holds whole [`WeatherSnapshot`] values only.  A newer publish
//! overwrites an undrained older one, so the render loop always picks up
//! the latest complete snapshot and never a mix of two payloads.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use super::WeatherSnapshot;

pub struct SnapshotSlot {
    latest: Signal<CriticalSectionRawMutex, WeatherSnapshot>,
    redraw_requested: AtomicBool,
    published: AtomicU64,
}

impl SnapshotSlot {
    pub const fn new() -> Self {
        Self {
            latest: Signal::new(),
            redraw_requested: AtomicBool::new(false),
            published: AtomicU64::new(0),
        }
    }

    /// Replace the pending snapshot.  Callable from any thread.
    pub fn publish(&self, snapshot: WeatherSnapshot) {
        self.latest.signal(snapshot);
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Drain the pending snapshot, if one arrived since the last take.
    pub fn take(&self) -> Option<WeatherSnapshot> {
        self.latest.try_take()
    }

    /// Whether a snapshot is waiting to be drained.
    pub fn has_pending(&self) -> bool {
        self.latest.signaled()
    }

    pub fn request_redraw(&self) {
        self.redraw_requested.store(true, Ordering::Release);
    }

    /// Consume a pending redraw request.
    pub fn take_redraw_request(&self) -> bool {
        self.redraw_requested.swap(false, Ordering::AcqRel)
    }

    /// Total snapshots published since construction.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for SnapshotSlot {
    fn default() -> Self {
        Self::new()
    }
}
