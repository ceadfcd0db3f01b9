//! Data items exchanged over the inter-device pub/sub transport.
//!
//! A data item is a key/value map addressed by a hierarchical path.
//! The map is a thin wrapper over a JSON object so that adapters can move
//! it over any byte channel with `serde_json`.
//!
//! | Path              | Direction          | Keys                               |
//! |-------------------|--------------------|------------------------------------|
//! | `/weather`        | watch → companion  | `uuid_code`                        |
//! | `/weatherDetails` | companion → watch  | `maxTemp`, `minTemp`, `weatherId`  |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request marker path (watch → companion).
pub const WEATHER_PATH: &str = "/weather";
/// Weather payload path (companion → watch).
pub const WEATHER_DETAILS_PATH: &str = "/weatherDetails";

pub const UUID_CODE_KEY: &str = "uuid_code";
pub const MAX_TEMP_KEY: &str = "maxTemp";
pub const MIN_TEMP_KEY: &str = "minTemp";
pub const WEATHER_ID_KEY: &str = "weatherId";

/// `weatherId` value meaning "no condition available".
pub const NO_CONDITION: i32 = -1;

/// Key/value payload of a data item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMap(Map<String, Value>);

impl DataMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.into(), Value::String(value.into()));
    }

    pub fn put_int(&mut self, key: &str, value: i32) {
        self.0.insert(key.into(), Value::from(value));
    }

    /// String value for `key`; `None` if absent or not a string.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Integer value for `key`; `default` if absent, not an integer, or
    /// outside the `i32` range.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.0
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a raw JSON value.
    pub fn put_value(&mut self, key: &str, value: Value) {
        self.0.insert(key.into(), value);
    }
}

/// A path-addressed data item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    pub path: String,
    pub data: DataMap,
}

impl DataItem {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: DataMap::new(),
        }
    }

    pub fn with_data(path: impl Into<String>, data: DataMap) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }
}

/// Whether the item was written or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEventKind {
    Changed,
    Deleted,
}

/// One entry in a "data changed" notification batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DataEvent {
    pub kind: DataEventKind,
    pub item: DataItem,
}

impl DataEvent {
    pub fn changed(item: DataItem) -> Self {
        Self {
            kind: DataEventKind::Changed,
            item,
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            kind: DataEventKind::Deleted,
            item: DataItem::new(path),
        }
    }
}
