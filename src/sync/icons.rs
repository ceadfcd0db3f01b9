//! Weather condition code → icon handle table.
//!
//! Condition codes follow the OpenWeatherMap numbering used by the
//! companion.  Ranges are checked in order and the first match wins; 761
//! (squalls) therefore resolves to fog, not storm.

use core::ops::RangeInclusive;

use crate::app::ports::IconLookup;

/// Icon art available on the watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Storm,
    LightRain,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Cloudy,
}

/// Ordered mapping rows.
const TABLE: &[(RangeInclusive<i32>, IconId)] = &[
    (200..=232, IconId::Storm),
    (300..=321, IconId::LightRain),
    (500..=504, IconId::Rain),
    (511..=511, IconId::Snow),
    (520..=531, IconId::Rain),
    (600..=622, IconId::Snow),
    (701..=761, IconId::Fog),
    (781..=781, IconId::Storm),
    (800..=800, IconId::Clear),
    (801..=801, IconId::LightClouds),
    (802..=804, IconId::Cloudy),
];

/// Every condition code that has art.
pub fn supported_conditions() -> impl Iterator<Item = i32> {
    TABLE.iter().flat_map(|(range, _)| range.clone())
}

/// Resolve a condition code.  Unsupported codes (including the `-1`
/// sentinel) resolve to `None`.
pub fn icon_for_weather_condition(weather_id: i32) -> Option<IconId> {
    TABLE
        .iter()
        .find(|(range, _)| range.contains(&weather_id))
        .map(|(_, icon)| *icon)
}

/// The built-in icon table.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherIconTable;

impl IconLookup for WeatherIconTable {
    fn icon_for_condition(&self, weather_id: i32) -> Option<IconId> {
        icon_for_weather_condition(weather_id)
    }
}
