//! Sunface watch-face library.
//!
//! A headless watch-face core: visibility/ambient state machine, a
//! self-correcting redraw timer, and a weather summary kept in sync with a
//! paired companion device.  Platform specifics (display, transport, clock)
//! sit behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod companion;
pub mod config;
pub mod connectivity;
pub mod fsm;
pub mod render;
pub mod sync;
pub mod timer;

mod error;

pub use error::{Error, Result};
