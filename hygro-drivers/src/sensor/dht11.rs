//! DHT11 humidity/temperature sensor
//!
//! Single-wire protocol, all timing by busy-waiting:
//!
//! ```text
//!  host request       sensor handshake        bit 0          bit 1 ...
//! ‾‾\________/‾‾‾‾‾‾\______/‾‾‾‾‾‾\____/‾‾‾‾\____/‾‾‾‾‾‾‾‾\__
//!    >=18 ms   20-40us  80 us   80 us  50 us 26us 50 us  70 us
//!                                             "0"          "1"
//! ```
//!
//! After the request the line belongs to the sensor. Each bit starts with
//! a 50 µs low gap; the length of the following high pulse encodes the
//! bit, so sampling a fixed offset after the rising edge decodes it.

use embedded_hal::delay::DelayNs;
use hygro_core::config::SensorConfig;
use hygro_core::line::{HandshakeStep, LineOwner, Phase};
use hygro_core::reading::{BitPacker, SensorReading};
use hygro_core::traits::{HumiditySensor, SensorError};
use hygro_hal::{FlexPin, Level};

use crate::wait::{wait_while, Expired};

/// DHT11 sensor on a bidirectional GPIO line
pub struct Dht11<P, D> {
    pin: P,
    delay: D,
    config: SensorConfig,
    phase: Phase,
}

impl<P, D> Dht11<P, D>
where
    P: FlexPin,
    D: DelayNs,
{
    /// Create a new sensor driver
    ///
    /// The line is released so the pull-up holds it high until the first
    /// request.
    pub fn new(mut pin: P, delay: D, config: SensorConfig) -> Self {
        pin.release();
        Self {
            pin,
            delay,
            config,
            phase: Phase::Idle,
        }
    }

    /// Current protocol phase (`Idle` between exchanges)
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Who owns the line right now
    pub fn line_owner(&self) -> LineOwner {
        self.phase.line_owner()
    }

    /// Access the data line
    pub fn line(&self) -> &P {
        &self.pin
    }

    /// Hold the line low for the start window, then hand it to the sensor
    fn request(&mut self) {
        self.phase = Phase::Requesting;
        self.pin.drive(Level::Low);
        self.delay.delay_ms(self.config.start_pulse_ms);
        self.pin.release();
        self.phase = self.phase.next();
    }

    /// Wait through response delay, acknowledgment pulse and ready pulse
    fn handshake(&mut self) -> Result<(), SensorError> {
        while let Phase::AwaitingResponse(step) = self.phase {
            let level = match step {
                HandshakeStep::AwaitLow | HandshakeStep::ReadyPulse => Level::High,
                HandshakeStep::AckPulse => Level::Low,
            };
            wait_while(
                &self.pin,
                &mut self.delay,
                level,
                self.config.handshake_timeout_us,
            )
            .map_err(|_| SensorError::HandshakeTimeout(step))?;
            self.phase = self.phase.next();
        }
        Ok(())
    }

    /// Sample the 40 payload bits, MSB first
    fn receive(&mut self) -> Result<SensorReading, SensorError> {
        let mut packer = BitPacker::new();
        let timeout = self.config.bit_timeout_us;

        while let Phase::ReceivingBit { byte, bit } = self.phase {
            let expired = |_: Expired| SensorError::DataTimeout { byte, bit };

            wait_while(&self.pin, &mut self.delay, Level::Low, timeout).map_err(expired)?;
            self.delay.delay_us(self.config.sample_offset_us);
            packer.push(self.pin.is_high());
            wait_while(&self.pin, &mut self.delay, Level::High, timeout).map_err(expired)?;

            self.phase = self.phase.next();
        }

        let stopped_at = packer.len();
        packer.finish().ok_or(SensorError::DataTimeout {
            byte: (stopped_at / 8) as u8,
            bit: (stopped_at % 8) as u8,
        })
    }

    fn exchange(&mut self) -> Result<SensorReading, SensorError> {
        self.request();
        self.handshake()?;
        self.receive()
    }
}

impl<P, D> HumiditySensor for Dht11<P, D>
where
    P: FlexPin,
    D: DelayNs,
{
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        let result = self.exchange();

        // Back to idle with the line released, whatever happened
        self.pin.release();
        self.phase = Phase::Idle;

        result
    }
}
