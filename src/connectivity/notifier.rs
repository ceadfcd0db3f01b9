//! Companion notifier: asks the phone to push fresh weather.
//!
//! Publishes a marker item at [`WEATHER_PATH`] carrying a fresh random
//! token.  The token only makes each request a distinct data item (so the
//! companion sees a change every time) and shows up in logs; no response is
//! correlated with it, nothing waits for an answer, and nothing retries.

use log::{info, warn};
use uuid::Uuid;

use crate::app::ports::Transport;
use crate::sync::data::{DataItem, UUID_CODE_KEY, WEATHER_PATH};

#[derive(Debug, Default)]
pub struct CompanionNotifier {
    requests_sent: u32,
}

impl CompanionNotifier {
    pub fn new() -> Self {
        Self { requests_sent: 0 }
    }

    /// Build the request marker for `token`.
    pub fn request_item(token: Uuid) -> DataItem {
        let mut item = DataItem::new(WEATHER_PATH);
        item.data.put_string(UUID_CODE_KEY, token.to_string());
        item
    }

    /// Publish a weather request.  Returns the token when the transport
    /// accepted the item.
    pub fn request_weather(&mut self, transport: &mut impl Transport) -> Option<Uuid> {
        let token = Uuid::new_v4();
        match transport.put_data_item(Self::request_item(token)) {
            Ok(()) => {
                self.requests_sent = self.requests_sent.wrapping_add(1);
                info!("Notifier: asked companion for weather (token={})", token);
                Some(token)
            }
            Err(e) => {
                warn!("Notifier: weather request not sent: {}", e);
                None
            }
        }
    }

    pub fn requests_sent(&self) -> u32 {
        self.requests_sent
    }
}
