//! Configuration types
//!
//! Board-agnostic configuration for the station, plus the parser for the
//! TOML file embedded into the firmware.

pub mod parse;
pub mod types;

pub use parse::{parse_config, parse_pin_string};
pub use types::*;
