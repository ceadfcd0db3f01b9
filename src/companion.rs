//! Companion (phone) side of the weather link.
//!
//! The phone watches `/weather` for request markers from the watch and
//! kicks its weather sync job; the job answers by publishing a
//! `/weatherDetails` item built with [`weather_details_item`].  Fetching
//! the weather itself happens behind [`SyncJob`] and is out of scope here.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};

use crate::app::ports::DataListener;
use crate::sync::data::{
    DataEvent, DataEventKind, DataItem, DataMap, MAX_TEMP_KEY, MIN_TEMP_KEY, WEATHER_DETAILS_PATH,
    WEATHER_ID_KEY, WEATHER_PATH,
};

/// The phone's weather sync job.
pub trait SyncJob: Send + Sync {
    /// Start a sync as soon as possible.  Must not block the caller.
    fn sync_now(&self);
}

/// Today's forecast as the sync job reads it from its store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReport {
    pub max_temp: f64,
    pub min_temp: f64,
    /// OpenWeatherMap condition code, `-1` when unknown.
    pub weather_id: i32,
}

/// Whole degrees with a degree sign, e.g. `72°`.
pub fn format_temperature(temp: f64) -> String {
    format!("{:.0}\u{00b0}", temp)
}

/// Build the `/weatherDetails` payload the watch decodes.
pub fn weather_details_item(report: &WeatherReport) -> DataItem {
    let mut data = DataMap::new();
    data.put_string(MAX_TEMP_KEY, format_temperature(report.max_temp));
    data.put_string(MIN_TEMP_KEY, format_temperature(report.min_temp));
    data.put_int(WEATHER_ID_KEY, report.weather_id);
    DataItem::with_data(WEATHER_DETAILS_PATH, data)
}

// ───────────────────────────────────────────────────────────────
// ResyncListener
// ───────────────────────────────────────────────────────────────

/// Background listener that triggers a resync on every watch request.
pub struct ResyncListener<J: SyncJob> {
    job: J,
    triggered: AtomicU64,
}

impl<J: SyncJob> ResyncListener<J> {
    pub fn new(job: J) -> Self {
        Self {
            job,
            triggered: AtomicU64::new(0),
        }
    }

    pub fn triggered(&self) -> u64 {
        self.triggered.load(Ordering::Relaxed)
    }

    pub fn job(&self) -> &J {
        &self.job
    }
}

impl<J: SyncJob> DataListener for ResyncListener<J> {
    fn on_data_changed(&self, events: &[DataEvent]) {
        for event in events {
            if event.kind != DataEventKind::Changed || event.item.path != WEATHER_PATH {
                debug!("Companion: ignoring {:?} {}", event.kind, event.item.path);
                continue;
            }
            self.triggered.fetch_add(1, Ordering::Relaxed);
            info!("Companion: watch asked for weather, syncing");
            self.job.sync_now();
        }
    }
}
