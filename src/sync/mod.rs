//! Companion data sync: decode pushed weather payloads into snapshots.
//!
//! ```text
//!  Transport ctx                              Render ctx
//!  ─────────────                              ──────────
//!  DataEvent batch ──▶ DataSyncAdapter ──▶ SnapshotSlot ──▶ FaceEngine.poll()
//!                        │ path filter         (1 slot)
//!                        │ field decode
//!                        └ IconLookup
//! ```

pub mod adapter;
pub mod data;
pub mod handoff;
pub mod icons;

pub use adapter::DataSyncAdapter;
pub use handoff::SnapshotSlot;
pub use icons::IconId;

/// Immutable weather summary as last received from the companion.
///
/// Each field is independently optional; an absent field renders blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub high_temp: Option<String>,
    pub low_temp: Option<String>,
    pub icon: Option<IconId>,
}

impl WeatherSnapshot {
    /// The "never synced" snapshot.
    pub const UNSET: Self = Self {
        high_temp: None,
        low_temp: None,
        icon: None,
    };

    pub fn is_unset(&self) -> bool {
        self.high_temp.is_none() && self.low_temp.is_none() && self.icon.is_none()
    }
}
