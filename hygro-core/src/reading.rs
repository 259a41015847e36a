//! Sensor reading model
//!
//! A DHT11 exchange yields 40 bits, packed MSB first into five bytes:
//! humidity integer, humidity fraction, temperature integer, temperature
//! fraction, checksum. The checksum is the 8-bit truncated sum of the
//! first four bytes.

/// Number of payload bytes in one exchange
pub const READING_BYTES: usize = 5;

/// Number of payload bits in one exchange
pub const READING_BITS: usize = READING_BYTES * 8;

/// Errors from validating a raw reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadingError {
    /// Checksum byte does not match the truncated sum of the data bytes
    ChecksumMismatch {
        /// Checksum computed from the four data bytes
        expected: u8,
        /// Checksum byte sent by the sensor
        actual: u8,
    },
}

/// One raw reading as transmitted by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    pub humidity_int: u8,
    pub humidity_frac: u8,
    pub temperature_int: u8,
    pub temperature_frac: u8,
    pub checksum: u8,
}

impl SensorReading {
    /// Build a reading from the five bytes in wire order
    pub const fn from_bytes(bytes: [u8; READING_BYTES]) -> Self {
        Self {
            humidity_int: bytes[0],
            humidity_frac: bytes[1],
            temperature_int: bytes[2],
            temperature_frac: bytes[3],
            checksum: bytes[4],
        }
    }

    /// Bytes in wire order
    pub const fn to_bytes(&self) -> [u8; READING_BYTES] {
        [
            self.humidity_int,
            self.humidity_frac,
            self.temperature_int,
            self.temperature_frac,
            self.checksum,
        ]
    }

    /// Checksum the sensor should have sent for the four data bytes
    pub fn expected_checksum(&self) -> u8 {
        checksum(&[
            self.humidity_int,
            self.humidity_frac,
            self.temperature_int,
            self.temperature_frac,
        ])
    }

    /// Check whether the checksum byte matches the data bytes
    pub fn is_valid(&self) -> bool {
        self.expected_checksum() == self.checksum
    }

    /// Validate the checksum, reporting both values on mismatch
    pub fn validate(&self) -> Result<(), ReadingError> {
        let expected = self.expected_checksum();
        if expected == self.checksum {
            Ok(())
        } else {
            Err(ReadingError::ChecksumMismatch {
                expected,
                actual: self.checksum,
            })
        }
    }
}

/// 8-bit truncated sum
///
/// The sum wraps at 256: 200 + 100 gives 44, not 300.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Accumulates sampled bits MSB first into the five reading bytes
#[derive(Debug, Clone, Default)]
pub struct BitPacker {
    bytes: [u8; READING_BYTES],
    count: usize,
}

impl BitPacker {
    /// Create an empty packer
    pub const fn new() -> Self {
        Self {
            bytes: [0; READING_BYTES],
            count: 0,
        }
    }

    /// Push the next sampled bit
    ///
    /// Bits past the 40th are ignored and `false` is returned.
    pub fn push(&mut self, bit: bool) -> bool {
        if self.count >= READING_BITS {
            return false;
        }
        let byte = &mut self.bytes[self.count / 8];
        *byte = (*byte << 1) | bit as u8;
        self.count += 1;
        true
    }

    /// Number of bits pushed so far
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if no bits have been pushed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if all 40 bits have been received
    pub fn is_complete(&self) -> bool {
        self.count == READING_BITS
    }

    /// Finish packing into a reading
    ///
    /// Returns `None` if fewer than 40 bits were pushed.
    pub fn finish(&self) -> Option<SensorReading> {
        self.is_complete()
            .then(|| SensorReading::from_bytes(self.bytes))
    }
}

/// Split a byte into its bits, most-significant first
pub fn encode_bits_msb_first(value: u8) -> [bool; 8] {
    let mut bits = [false; 8];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = value & (0x80 >> i) != 0;
    }
    bits
}

/// Reassemble a byte from bits given most-significant first
pub fn decode_bits(bits: &[bool; 8]) -> u8 {
    bits.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8)
}
