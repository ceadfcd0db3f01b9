//! Data listener that turns `/weatherDetails` items into weather snapshots.
//!
//! Runs on the transport's callback context.  It never touches render
//! state directly: every decoded payload becomes one complete
//! [`WeatherSnapshot`] published through the [`SnapshotSlot`], followed by
//! a redraw request that the render loop honours only while visible.

use std::sync::Arc;

use log::debug;

use crate::app::ports::{DataListener, IconLookup};

use super::data::{
    DataEvent, DataEventKind, DataMap, MAX_TEMP_KEY, MIN_TEMP_KEY, NO_CONDITION,
    WEATHER_DETAILS_PATH, WEATHER_ID_KEY,
};
use super::{SnapshotSlot, WeatherSnapshot};

pub struct DataSyncAdapter<L: IconLookup> {
    slot: Arc<SnapshotSlot>,
    icons: L,
}

impl<L: IconLookup> DataSyncAdapter<L> {
    pub fn new(slot: Arc<SnapshotSlot>, icons: L) -> Self {
        Self { slot, icons }
    }

    /// Decode one payload.  Missing or mistyped fields come out unset;
    /// the sentinel condition code leaves the icon unset.
    pub fn decode(&self, data: &DataMap) -> WeatherSnapshot {
        let high_temp = data.get_string(MAX_TEMP_KEY).map(str::to_owned);
        let low_temp = data.get_string(MIN_TEMP_KEY).map(str::to_owned);
        let weather_id = data.get_int(WEATHER_ID_KEY, NO_CONDITION);
        let icon = if weather_id == NO_CONDITION {
            None
        } else {
            self.icons.icon_for_condition(weather_id)
        };

        debug!(
            "Sync: high={:?} low={:?} weatherId={} icon={:?}",
            high_temp, low_temp, weather_id, icon
        );

        WeatherSnapshot {
            high_temp,
            low_temp,
            icon,
        }
    }
}

impl<L: IconLookup> DataListener for DataSyncAdapter<L> {
    fn on_data_changed(&self, events: &[DataEvent]) {
        debug!("Sync: data changed ({} events)", events.len());

        let mut updated = false;
        for event in events {
            if event.kind != DataEventKind::Changed {
                continue;
            }
            if event.item.path != WEATHER_DETAILS_PATH {
                debug!("Sync: ignoring path {}", event.item.path);
                continue;
            }
            self.slot.publish(self.decode(&event.item.data));
            updated = true;
        }

        if updated {
            self.slot.request_redraw();
        }
    }
}
