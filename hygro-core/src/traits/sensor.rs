//! Humidity/temperature sensor trait

use crate::line::HandshakeStep;
use crate::reading::SensorReading;

/// Errors that can occur during a sensor exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The sensor did not complete a handshake step before the deadline
    HandshakeTimeout(HandshakeStep),
    /// The line stopped toggling while receiving payload bit `bit` of `byte`
    DataTimeout { byte: u8, bit: u8 },
}

impl SensorError {
    /// Check if the sensor never answered the request at all
    ///
    /// Typically means the sensor is disconnected or unpowered.
    pub fn is_no_response(&self) -> bool {
        matches!(self, SensorError::HandshakeTimeout(HandshakeStep::AwaitLow))
    }
}

/// Trait for humidity/temperature sensors
///
/// One call performs one complete exchange and returns the five raw bytes.
/// Checksum validation is left to the caller so that a mismatching reading
/// can still be inspected and logged.
pub trait HumiditySensor {
    /// Perform one exchange with the sensor
    fn read(&mut self) -> Result<SensorReading, SensorError>;
}
