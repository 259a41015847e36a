//! Hygro - Humidity/Temperature Station Firmware
//!
//! Reads a DHT11 sensor over its single-wire protocol and shows the result
//! on an HD44780 character display reached through a bit-banged two-wire
//! bus to a PCF8574 backpack. Pin assignment and protocol timing come
//! from the embedded `station.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use hygro_core::Station;
use hygro_drivers::bus::TwoWireMaster;
use hygro_drivers::display::CharacterLcd;
use hygro_drivers::sensor::Dht11;
use hygro_hal_rp2040::{OpenDrainLine, PinBank, PushPullLine};

mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hygro firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    config::log_config(&config);

    let mut pins = PinBank::new(p);
    let (scl, sda, data) = match (
        pins.take(config.pins.scl),
        pins.take(config.pins.sda),
        pins.take(config.pins.sensor),
    ) {
        (Ok(scl), Ok(sda), Ok(data)) => (scl, sda, data),
        _ => {
            // Parser rejects overlapping pins, so this is a wiring bug
            error!("Pin assignment failed");
            return;
        }
    };

    let bus = TwoWireMaster::new(
        PushPullLine::new(scl),
        OpenDrainLine::new(sda),
        Delay,
        config.bus,
    );
    let lcd = CharacterLcd::new(bus, config.display);
    let sensor = Dht11::new(OpenDrainLine::new(data), Delay, config.sensor);
    info!("Drivers initialized");

    let station = Station::new(sensor, lcd);
    spawner
        .spawn(tasks::station_task(station, config.poll_interval_ms))
        .unwrap();

    info!("All tasks spawned");
}
