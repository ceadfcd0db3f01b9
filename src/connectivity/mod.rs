//! Connectivity to the paired companion device.
//!
//! - [`channel`]: session lifecycle, listener registration, reconnects.
//! - [`notifier`]: the "please send weather" request.
//! - [`backoff`]: retry delays for failed or suspended sessions.

pub mod backoff;
pub mod channel;
pub mod notifier;

pub use backoff::Backoff;
pub use channel::ConnectivityChannel;
pub use notifier::CompanionNotifier;

/// Session state as tracked by the watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Session dropped; a reconnect is scheduled.
    Suspended,
    /// Connect attempt failed.  A retry may still be scheduled; once the
    /// retry budget is spent the channel stays here until reopened.
    Failed,
}

impl ConnectionState {
    /// Whether the face should show the connectivity-degraded indicator.
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Suspended | Self::Failed)
    }
}
