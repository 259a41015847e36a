//! Station orchestrator
//!
//! One poll cycle: read the sensor, validate the checksum, format the two
//! rows and write them to the display. The caller owns the loop and the
//! inter-poll delay.

use crate::format::{self, FormatError, ERROR_MARKER, NO_RESPONSE, READ_TIMEOUT};
use crate::reading::{ReadingError, SensorReading};
use crate::traits::{DisplayError, HumiditySensor, SensorError, TextDisplay};

/// Row showing humidity (or the error marker)
pub const HUMIDITY_ROW: u8 = 0;

/// Row showing temperature (or a diagnostic)
pub const TEMPERATURE_ROW: u8 = 1;

/// Errors that abort a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationError {
    /// The display could not be written
    Display(DisplayError),
    /// A row did not fit the formatting buffer
    Format(FormatError),
}

impl From<DisplayError> for StationError {
    fn from(e: DisplayError) -> Self {
        StationError::Display(e)
    }
}

impl From<FormatError> for StationError {
    fn from(e: FormatError) -> Self {
        StationError::Format(e)
    }
}

/// What a completed poll cycle showed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Reading passed the checksum and is on the display
    Valid(SensorReading),
    /// Reading failed the checksum; the error marker is on the display
    ChecksumMismatch { expected: u8, actual: u8 },
    /// Sensor exchange timed out; error marker and diagnostic are shown
    SensorTimeout(SensorError),
}

/// Running counters across poll cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    pub valid: u32,
    pub checksum_failures: u32,
    pub sensor_timeouts: u32,
    pub display_failures: u32,
    pub format_failures: u32,
}

impl PollStats {
    /// Count one poll cycle; counters saturate instead of wrapping
    pub fn record(&mut self, outcome: &Result<PollOutcome, StationError>) {
        let counter = match outcome {
            Ok(PollOutcome::Valid(_)) => &mut self.valid,
            Ok(PollOutcome::ChecksumMismatch { .. }) => &mut self.checksum_failures,
            Ok(PollOutcome::SensorTimeout(_)) => &mut self.sensor_timeouts,
            Err(StationError::Display(_)) => &mut self.display_failures,
            Err(StationError::Format(_)) => &mut self.format_failures,
        };
        *counter = counter.saturating_add(1);
    }

    /// Total number of poll cycles recorded
    pub fn total(&self) -> u32 {
        self.valid
            .saturating_add(self.checksum_failures)
            .saturating_add(self.sensor_timeouts)
            .saturating_add(self.display_failures)
            .saturating_add(self.format_failures)
    }
}

/// Station context
///
/// Owns the sensor, the display and the most recent reading.
pub struct Station<S, L> {
    sensor: S,
    display: L,
    current: Option<SensorReading>,
    stats: PollStats,
}

impl<S, L> Station<S, L>
where
    S: HumiditySensor,
    L: TextDisplay,
{
    /// Create a new station
    pub fn new(sensor: S, display: L) -> Self {
        Self {
            sensor,
            display,
            current: None,
            stats: PollStats::default(),
        }
    }

    /// Initialize the display
    ///
    /// Must be called once before the first poll.
    pub fn start(&mut self) -> Result<(), StationError> {
        self.display.init()?;
        Ok(())
    }

    /// Run one poll cycle
    pub fn poll(&mut self) -> Result<PollOutcome, StationError> {
        let outcome = match self.sensor.read() {
            Ok(reading) => self.show_reading(reading),
            Err(e) => self.show_sensor_error(e),
        };

        self.stats.record(&outcome);
        outcome
    }

    fn show_reading(&mut self, reading: SensorReading) -> Result<PollOutcome, StationError> {
        self.current = Some(reading);

        if let Err(ReadingError::ChecksumMismatch { expected, actual }) = reading.validate() {
            // Second row keeps whatever the last valid reading left there
            self.display.write_row(HUMIDITY_ROW, ERROR_MARKER)?;
            return Ok(PollOutcome::ChecksumMismatch { expected, actual });
        }

        let rows = format::humidity_row(&reading)
            .and_then(|hum| format::temperature_row(&reading).map(|temp| (hum, temp)));

        match rows {
            Ok((hum, temp)) => {
                self.display.write_row(HUMIDITY_ROW, &hum)?;
                self.display.write_row(TEMPERATURE_ROW, &temp)?;
                Ok(PollOutcome::Valid(reading))
            }
            Err(e) => {
                self.display.write_row(HUMIDITY_ROW, ERROR_MARKER)?;
                Err(StationError::Format(e))
            }
        }
    }

    fn show_sensor_error(&mut self, error: SensorError) -> Result<PollOutcome, StationError> {
        self.current = None;

        let detail = match error {
            SensorError::HandshakeTimeout(_) => NO_RESPONSE,
            SensorError::DataTimeout { .. } => READ_TIMEOUT,
        };
        self.display.write_row(HUMIDITY_ROW, ERROR_MARKER)?;
        self.display.write_row(TEMPERATURE_ROW, detail)?;

        Ok(PollOutcome::SensorTimeout(error))
    }

    /// Most recent reading, valid or not
    ///
    /// `None` before the first poll and after a sensor timeout.
    pub fn current(&self) -> Option<&SensorReading> {
        self.current.as_ref()
    }

    /// Poll counters
    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    /// Access the display
    pub fn display(&self) -> &L {
        &self.display
    }
}
