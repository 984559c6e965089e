//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control rules for the relay board: command
//! arbitration, the tick loop, and the events it reports. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
