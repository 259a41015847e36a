//! Configuration loading
//!
//! The configuration is compiled into the firmware from `station.toml`
//! and parsed at boot by the no_std parser in `hygro-core`.

use defmt::*;
use hygro_core::config::{parse_config, StationConfig};

/// Embedded configuration (compiled into firmware)
/// Edit station.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../station.toml");

/// Parse the embedded configuration, falling back to built-in defaults
pub fn load_config() -> StationConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded station.toml");
            config
        }
        Err(e) => {
            // build.rs validates the file, so this means the two disagree
            error!("station.toml rejected ({}), using defaults", e);
            StationConfig::default()
        }
    }
}

/// Log the effective configuration
pub fn log_config(config: &StationConfig) {
    info!(
        "Pins: scl=gpio{} sda=gpio{} sensor=gpio{}",
        config.pins.scl, config.pins.sda, config.pins.sensor
    );
    info!(
        "Display: address={:#x} {}x{}",
        config.display.address, config.display.columns, config.display.rows
    );
    info!(
        "Sensor: start={}ms sample={}us, poll every {}ms",
        config.sensor.start_pulse_ms, config.sensor.sample_offset_us, config.poll_interval_ms
    );
}
