//! Display row formatting
//!
//! Rows are formatted into a fixed-capacity buffer. Text that does not fit
//! is reported as [`FormatError::Overrun`], never silently cut off.

use core::fmt::{self, Write};

use heapless::String;

use crate::reading::SensorReading;

/// Capacity of one formatted row in bytes
///
/// The longest row ("Temp = 255.255°C") is 17 bytes.
pub const ROW_CAPACITY: usize = 20;

/// One formatted display row
pub type Row = String<ROW_CAPACITY>;

/// Marker shown on the first row when a reading cannot be displayed
pub const ERROR_MARKER: &str = "Error";

/// Second-row diagnostic when the sensor never answers the request
pub const NO_RESPONSE: &str = "No response";

/// Second-row diagnostic when the sensor stops mid-transfer
pub const READ_TIMEOUT: &str = "Read timeout";

/// Degree sign as rendered in the temperature row
pub const DEGREE: char = '°';

/// Formatting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// Formatted text does not fit the row buffer
    Overrun,
}

impl From<fmt::Error> for FormatError {
    fn from(_: fmt::Error) -> Self {
        FormatError::Overrun
    }
}

/// Format arguments into a bounded buffer of `N` bytes
pub fn format_bounded<const N: usize>(args: fmt::Arguments<'_>) -> Result<String<N>, FormatError> {
    let mut out = String::new();
    out.write_fmt(args)?;
    Ok(out)
}

/// First row: `Hum = {int}.{frac}%`
pub fn humidity_row(reading: &SensorReading) -> Result<Row, FormatError> {
    format_bounded(format_args!(
        "Hum = {}.{}%",
        reading.humidity_int, reading.humidity_frac
    ))
}

/// Second row: `Temp = {int}.{frac}°C`
pub fn temperature_row(reading: &SensorReading) -> Result<Row, FormatError> {
    format_bounded(format_args!(
        "Temp = {}.{}{}C",
        reading.temperature_int, reading.temperature_frac, DEGREE
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rows() {
        let reading = SensorReading::from_bytes([45, 0, 23, 5, 73]);
        assert_eq!(humidity_row(&reading).unwrap().as_str(), "Hum = 45.0%");
        assert_eq!(temperature_row(&reading).unwrap().as_str(), "Temp = 23.5°C");
    }

    #[test]
    fn test_widest_rows_fit() {
        let reading = SensorReading::from_bytes([255, 255, 255, 255, 0]);
        let hum = humidity_row(&reading).unwrap();
        let temp = temperature_row(&reading).unwrap();
        assert_eq!(hum.as_str(), "Hum = 255.255%");
        assert_eq!(temp.as_str(), "Temp = 255.255°C");
        assert!(temp.len() <= ROW_CAPACITY);
    }

    #[test]
    fn test_overrun_is_reported() {
        let result: Result<String<8>, _> = format_bounded(format_args!("Temp = {}", 23));
        assert_eq!(result, Err(FormatError::Overrun));

        let exact: Result<String<8>, _> = format_bounded(format_args!("Hum = {}", 45));
        assert_eq!(exact.unwrap().as_str(), "Hum = 45");
    }
}
