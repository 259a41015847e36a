//! GPIO lines backed by embassy-rp
//!
//! The RP2040 pads have no true open-drain mode. [`OpenDrainLine`] emulates
//! it: the output latch stays low, the line is released by disabling the
//! output (the pull-up takes it high) and pulled low by enabling it.

use embassy_rp::gpio::{AnyPin, Flex, Level as RpLevel, Output, Pull};
use embassy_rp::Peri;
use hygro_hal::{Direction, FlexPin, InputPin, OutputPin};

/// Push-pull output line (bus clock)
pub struct PushPullLine<'d> {
    pin: Output<'d>,
}

impl<'d> PushPullLine<'d> {
    /// Configure `pin` as an output, initially high
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, RpLevel::High),
        }
    }
}

impl OutputPin for PushPullLine<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Bidirectional line with the internal pull-up (bus data, sensor data)
///
/// Only output-enable is ever toggled, so the pad can pull low but never
/// drives high.
pub struct OpenDrainLine<'d> {
    pin: Flex<'d>,
    /// Logical output level; high means released
    high: bool,
}

impl<'d> OpenDrainLine<'d> {
    /// Configure `pin` as a released input with the pull-up enabled
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::Up);
        pin.set_as_input();
        pin.set_low();
        Self { pin, high: true }
    }
}

impl OutputPin for OpenDrainLine<'_> {
    fn set_high(&mut self) {
        self.high = true;
        self.pin.set_as_input();
    }

    fn set_low(&mut self) {
        self.high = false;
        self.pin.set_as_output();
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl InputPin for OpenDrainLine<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for OpenDrainLine<'_> {
    fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Output if !self.high => self.pin.set_as_output(),
            _ => self.pin.set_as_input(),
        }
    }
}
