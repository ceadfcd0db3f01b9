//! Unified error types for the watch-face core.
//!
//! Most failures inside the core are non-fatal (missing icons, absent
//! weather, dropped connections) and are logged where they happen.  What
//! escapes to the caller is setup trouble: a configuration that fails to
//! load or validate.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation that escapes the core funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
