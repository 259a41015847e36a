//! Bit-banged two-wire bus master
//!
//! Drives a clock line and an open-drain data line to frame bytes for a
//! single write-only device. Data changes only while the clock is low and
//! is sampled by the receiver while the clock is high; the only data edges
//! with the clock high are the start and stop conditions.
//!
//! There is no inter-bit delay: the bit rate is set by instruction timing
//! alone. The PCF8574 tolerates this at RP2040 clock speeds.

use embedded_hal::delay::DelayNs;
use hygro_core::config::BusConfig;
use hygro_core::traits::DisplayError;
use hygro_hal::{FlexPin, Level, OutputPin};

use crate::wait::wait_while;

/// Bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The device did not pull data low before the acknowledgment deadline
    AckTimeout,
}

impl From<BusError> for DisplayError {
    fn from(e: BusError) -> Self {
        match e {
            BusError::AckTimeout => DisplayError::AckTimeout,
        }
    }
}

/// Two-wire bus master
///
/// Owns both lines and the delay provider. The clock is a push-pull output;
/// the data line is released to the pull-up for a `1` and driven low for a
/// `0`, so the device can pull it low to acknowledge.
pub struct TwoWireMaster<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    config: BusConfig,
}

impl<SCL, SDA, D> TwoWireMaster<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: FlexPin,
    D: DelayNs,
{
    /// Create a new bus master and leave the bus idle (both lines high)
    pub fn new(mut scl: SCL, mut sda: SDA, delay: D, config: BusConfig) -> Self {
        sda.release();
        scl.set_high();
        Self {
            scl,
            sda,
            delay,
            config,
        }
    }

    fn set_data(&mut self, level: Level) {
        match level {
            Level::High => self.sda.release(),
            Level::Low => self.sda.drive(Level::Low),
        }
    }

    /// Start condition: data falls while the clock is high
    pub fn start(&mut self) {
        self.set_data(Level::High);
        self.scl.set_high();
        self.set_data(Level::Low);
        self.scl.set_low();
    }

    /// Stop condition: data rises while the clock is high
    ///
    /// Leaves the bus idle.
    pub fn stop(&mut self) {
        self.scl.set_low();
        self.set_data(Level::Low);
        self.scl.set_high();
        self.set_data(Level::High);
    }

    /// Clock out one byte, most significant bit first
    pub fn write_byte(&mut self, value: u8) {
        for bit in (0..8).rev() {
            self.scl.set_low();
            self.set_data(Level::from(value & (1 << bit) != 0));
            self.scl.set_high();
        }
    }

    /// Release data, raise the clock and wait for the device to pull data low
    ///
    /// The clock is left high; the next byte or stop condition lowers it.
    pub fn wait_ack(&mut self) -> Result<(), BusError> {
        self.scl.set_low();
        self.set_data(Level::High);
        self.scl.set_high();

        wait_while(
            &self.sda,
            &mut self.delay,
            Level::High,
            self.config.ack_timeout_us,
        )
        .map(|_| ())
        .map_err(|_| BusError::AckTimeout)
    }

    /// Write one byte and wait for its acknowledgment
    pub fn write_acked(&mut self, value: u8) -> Result<(), BusError> {
        self.write_byte(value);
        self.wait_ack()
    }

    /// Run one addressed frame: start, address, `body`, stop
    ///
    /// `address` is the address byte as sent on the wire (write form).
    /// The stop condition is sent even when a byte is not acknowledged, so
    /// the bus is always left idle.
    pub fn transaction<F>(&mut self, address: u8, body: F) -> Result<(), BusError>
    where
        F: FnOnce(&mut Self) -> Result<(), BusError>,
    {
        self.start();
        let result = self.write_acked(address).and_then(|()| body(self));
        self.stop();
        result
    }

    /// Access the delay provider
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BusEvent, SimBus, SimDelay, SimScl, SimSda};

    fn master(bus: &SimBus) -> TwoWireMaster<SimScl, SimSda, SimDelay> {
        TwoWireMaster::new(bus.scl(), bus.sda(), bus.delay(), BusConfig::default())
    }

    fn write_all(
        master: &mut TwoWireMaster<SimScl, SimSda, SimDelay>,
        address: u8,
        payload: &[u8],
    ) -> Result<(), BusError> {
        master.transaction(address, |bus| {
            payload.iter().try_for_each(|&byte| bus.write_acked(byte))
        })
    }

    #[test]
    fn test_new_leaves_bus_idle() {
        let bus = SimBus::new();
        let _master = master(&bus);
        assert!(bus.is_idle());
        assert!(bus.events().is_empty());
    }

    #[test]
    fn test_frame_is_decoded() {
        let bus = SimBus::new();
        let mut master = master(&bus);

        write_all(&mut master, 0x4E, &[0xA5, 0x0C]).unwrap();

        assert_eq!(
            bus.events(),
            vec![
                BusEvent::Start,
                BusEvent::Byte { value: 0x4E, acked: true },
                BusEvent::Byte { value: 0xA5, acked: true },
                BusEvent::Byte { value: 0x0C, acked: true },
                BusEvent::Stop,
            ]
        );
        assert!(bus.is_idle());
    }

    #[test]
    fn test_missing_device_times_out() {
        let bus = SimBus::new();
        bus.set_acking(false);
        let mut master = master(&bus);

        let before = bus.now_us();
        assert_eq!(write_all(&mut master, 0x4E, &[0x01]), Err(BusError::AckTimeout));

        // Gave up after the address byte and still sent the stop condition
        assert_eq!(bus.now_us() - before, BusConfig::default().ack_timeout_us as u64);
        assert_eq!(
            bus.events(),
            vec![
                BusEvent::Start,
                BusEvent::Byte { value: 0x4E, acked: false },
                BusEvent::Stop,
            ]
        );
        assert!(bus.is_idle());
    }

    #[test]
    fn test_data_never_driven_against_acknowledgment() {
        let bus = SimBus::new();
        let mut master = master(&bus);

        // Every byte ends in a 0 bit, so data is low when the device acks
        write_all(&mut master, 0x4E, &[0x00, 0x08, 0xFE]).unwrap();

        assert!(!bus.contended());
        assert!(bus.is_idle());
    }

    #[test]
    fn test_ack_timeout_maps_to_display_error() {
        assert_eq!(DisplayError::from(BusError::AckTimeout), DisplayError::AckTimeout);
    }
}
