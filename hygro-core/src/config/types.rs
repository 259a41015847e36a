//! Configuration type definitions
//!
//! Defaults follow the DHT11 datasheet and the common PCF8574 LCD backpack.

/// Highest valid GPIO number (RP2040 has GPIO0-29)
pub const MAX_GPIO: u8 = 29;

/// Rows the station writes: humidity on row 0, temperature on row 1
pub const DISPLAY_ROWS: u8 = 2;

/// Narrowest display that fits the widest row ("Temp = 255.255°C")
pub const MIN_COLUMNS: u8 = 16;

/// Widest HD44780 line
pub const MAX_COLUMNS: u8 = 40;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Key not recognised in its section
    UnknownKey,
    /// Value parsed but lies outside the allowed range
    OutOfRange,
    /// Two lines were assigned the same GPIO
    PinConflict,
}

/// Two-wire bus timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Deadline for the addressed device to pull data low (µs)
    pub ack_timeout_us: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            ack_timeout_us: 1_000,
        }
    }
}

/// Character display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// 7-bit bus address of the I/O expander
    pub address: u8,
    /// Characters per row
    pub columns: u8,
    /// Number of rows (must be 2)
    pub rows: u8,
    /// Hold time after asserting enable (ms)
    pub enable_pulse_ms: u32,
    /// Settle time after deasserting enable (ms)
    pub latch_settle_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: 0x27,
            columns: 16,
            rows: 2,
            enable_pulse_ms: 1,
            latch_settle_ms: 10,
        }
    }
}

impl DisplayConfig {
    /// Address byte in write form (address shifted left, R/W bit clear)
    pub const fn write_address(&self) -> u8 {
        self.address << 1
    }
}

/// Single-wire sensor timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Request pulse length (ms); the DHT11 needs at least 18
    pub start_pulse_ms: u32,
    /// Delay from the rising edge of a bit to the sample point (µs)
    ///
    /// Must fall after a `0` pulse (~26-28 µs) has ended and before a `1`
    /// pulse (~70 µs) has.
    pub sample_offset_us: u32,
    /// Deadline for each handshake step (µs)
    pub handshake_timeout_us: u32,
    /// Deadline for each half of a payload bit (µs)
    pub bit_timeout_us: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            start_pulse_ms: 20,
            sample_offset_us: 30,
            handshake_timeout_us: 1_000,
            bit_timeout_us: 200,
        }
    }
}

/// GPIO assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinsConfig {
    /// Display bus clock
    pub scl: u8,
    /// Display bus data
    pub sda: u8,
    /// Sensor data line
    pub sensor: u8,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            scl: 1,
            sda: 0,
            sensor: 2,
        }
    }
}

/// Complete station configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationConfig {
    /// Delay between poll cycles (ms)
    pub poll_interval_ms: u32,
    pub bus: BusConfig,
    pub display: DisplayConfig,
    pub sensor: SensorConfig,
    pub pins: PinsConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            bus: BusConfig::default(),
            display: DisplayConfig::default(),
            sensor: SensorConfig::default(),
            pins: PinsConfig::default(),
        }
    }
}

impl StationConfig {
    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::OutOfRange);
        }

        if self.bus.ack_timeout_us == 0 {
            return Err(ConfigError::OutOfRange);
        }

        let d = &self.display;
        if d.address > 0x7F
            || !(MIN_COLUMNS..=MAX_COLUMNS).contains(&d.columns)
            || d.rows != DISPLAY_ROWS
        {
            return Err(ConfigError::OutOfRange);
        }

        let s = &self.sensor;
        if s.start_pulse_ms < 18 || !(29..=69).contains(&s.sample_offset_us) {
            return Err(ConfigError::OutOfRange);
        }
        if s.handshake_timeout_us == 0 || s.bit_timeout_us <= s.sample_offset_us {
            return Err(ConfigError::OutOfRange);
        }

        let p = &self.pins;
        if p.scl > MAX_GPIO || p.sda > MAX_GPIO || p.sensor > MAX_GPIO {
            return Err(ConfigError::OutOfRange);
        }
        if p.scl == p.sda || p.scl == p.sensor || p.sda == p.sensor {
            return Err(ConfigError::PinConflict);
        }

        Ok(())
    }
}
