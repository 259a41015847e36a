//! Station polling task
//!
//! Runs one poll cycle, logs the outcome and sleeps for the configured
//! interval. The protocol drivers busy-wait internally; only the gap
//! between polls yields to the executor.

use defmt::*;
use embassy_time::{Delay, Timer};

use hygro_core::traits::SensorError;
use hygro_core::{PollOutcome, Station, StationError};
use hygro_drivers::display::CharacterLcd;
use hygro_drivers::sensor::Dht11;
use hygro_hal_rp2040::{OpenDrainLine, PushPullLine};

/// Log cumulative statistics every this many polls
const STATS_EVERY: u32 = 120;

/// Display driver as wired on the board
pub type Lcd = CharacterLcd<PushPullLine<'static>, OpenDrainLine<'static>, Delay>;

/// Sensor driver as wired on the board
pub type Sensor = Dht11<OpenDrainLine<'static>, Delay>;

/// The station with concrete RP2040 drivers
pub type FirmwareStation = Station<Sensor, Lcd>;

fn log_outcome(outcome: &Result<PollOutcome, StationError>) {
    match outcome {
        Ok(PollOutcome::Valid(reading)) => {
            debug!(
                "Hum {}.{}% Temp {}.{}C",
                reading.humidity_int,
                reading.humidity_frac,
                reading.temperature_int,
                reading.temperature_frac
            );
        }
        Ok(PollOutcome::ChecksumMismatch { expected, actual }) => {
            warn!("Checksum mismatch: expected {}, got {}", expected, actual);
        }
        Ok(PollOutcome::SensorTimeout(e)) => match e {
            SensorError::HandshakeTimeout(step) => {
                warn!("Sensor did not answer ({})", step);
            }
            SensorError::DataTimeout { byte, bit } => {
                warn!("Sensor stalled at byte {} bit {}", byte, bit);
            }
        },
        Err(StationError::Display(e)) => {
            error!("Display write failed: {}", e);
        }
        Err(StationError::Format(e)) => {
            error!("Row formatting failed: {}", e);
        }
    }
}

/// Station task - polls the sensor and refreshes the display forever
#[embassy_executor::task]
pub async fn station_task(mut station: FirmwareStation, poll_interval_ms: u32) {
    info!("Station task started");

    match station.start() {
        Ok(()) => info!("Display initialized"),
        Err(e) => error!("Display init failed: {}", e),
    }

    loop {
        let outcome = station.poll();
        log_outcome(&outcome);

        let stats = station.stats();
        trace!("Poll {} done", stats.total());
        if stats.total() % STATS_EVERY == 0 {
            info!(
                "Stats: {} valid, {} checksum, {} timeout, {} display",
                stats.valid, stats.checksum_failures, stats.sensor_timeouts, stats.display_failures
            );
        }

        Timer::after_millis(poll_interval_ms as u64).await;
    }
}
