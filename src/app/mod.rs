//! Application core: face lifecycle and rendering logic, zero I/O.
//!
//! This module contains the rules of the watch face: visibility/ambient
//! handling, redraw scheduling, weather snapshot adoption and frame
//! composition.  All interaction with the display, the companion transport
//! and the clock happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without a device.

pub mod engine;
pub mod events;
pub mod ports;
