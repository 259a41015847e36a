//! Board-agnostic core logic for the humidity/temperature station
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sensor reading model (five raw bytes, checksum validation, bit packing)
//! - Single-wire protocol phases and line ownership
//! - Bounded text formatting for the display rows
//! - Configuration types and the embedded TOML subset parser
//! - Hardware abstraction traits (sensor, text display)
//! - The station orchestrator tying one poll cycle together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod format;
pub mod line;
pub mod reading;
pub mod station;
pub mod traits;

pub use reading::SensorReading;
pub use station::{PollOutcome, PollStats, Station, StationError};
