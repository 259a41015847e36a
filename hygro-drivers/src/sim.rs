//! Host-side line simulation for protocol tests
//!
//! A shared nanosecond clock is advanced only by [`SimDelay`]; simulated
//! lines derive their level from it, so every waveform test is
//! deterministic.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use hygro_hal::{Direction, FlexPin, InputPin, Level, OutputPin};

/// Simulated time in nanoseconds
pub type Clock = Rc<Cell<u64>>;

/// Delay provider that advances the simulated clock
pub struct SimDelay {
    clock: Clock,
}

impl SimDelay {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.set(self.clock.get() + u64::from(ns));
    }
}

// ---------------------------------------------------------------------------
// Two-wire bus
// ---------------------------------------------------------------------------

/// What the simulated device saw on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    Byte { value: u8, acked: bool },
    Stop,
}

/// Bus lines plus a write-only device that decodes traffic
struct BusState {
    scl: Level,
    sda_out: Level,
    sda_direction: Direction,
    /// Device is holding data low for an acknowledgment
    device_low: bool,
    /// Device acknowledges received bytes
    acking: bool,
    in_frame: bool,
    bits: u8,
    shift: u8,
    /// Current clock pulse is the acknowledgment clock
    ack_clock: bool,
    /// Master drove data high while the device held it low
    contended: bool,
    events: Vec<BusEvent>,
}

impl BusState {
    fn check_contention(&mut self) {
        let master_high = self.sda_direction == Direction::Output && self.sda_out == Level::High;
        if master_high && self.device_low {
            self.contended = true;
        }
    }

    fn sda(&self) -> Level {
        let master_low = self.sda_direction == Direction::Output && self.sda_out == Level::Low;
        Level::from(!(master_low || self.device_low))
    }

    fn set_scl(&mut self, level: Level) {
        let previous = self.scl;
        self.scl = level;
        match (previous, level) {
            (Level::Low, Level::High) => self.clock_rising(),
            (Level::High, Level::Low) => self.clock_falling(),
            _ => {}
        }
    }

    /// Apply a master-side data change and detect start/stop conditions
    fn update_sda(&mut self, change: impl FnOnce(&mut Self)) {
        let before = self.sda();
        change(self);
        self.check_contention();
        let after = self.sda();

        if self.scl.is_high() && before != after {
            if after.is_low() {
                self.events.push(BusEvent::Start);
                self.in_frame = true;
                self.bits = 0;
                self.shift = 0;
                self.ack_clock = false;
            } else {
                self.events.push(BusEvent::Stop);
                self.in_frame = false;
                self.device_low = false;
            }
        }
    }

    fn clock_rising(&mut self) {
        if self.in_frame && !self.ack_clock && self.bits < 8 {
            self.shift = (self.shift << 1) | self.sda().is_high() as u8;
            self.bits += 1;
        }
    }

    fn clock_falling(&mut self) {
        if !self.in_frame {
            return;
        }
        if self.ack_clock {
            self.device_low = false;
            self.ack_clock = false;
            self.bits = 0;
            self.shift = 0;
        } else if self.bits == 8 {
            self.events.push(BusEvent::Byte {
                value: self.shift,
                acked: self.acking,
            });
            self.device_low = self.acking;
            self.ack_clock = true;
            self.check_contention();
        }
    }
}

/// Simulated two-wire bus with one attached device
pub struct SimBus {
    state: Rc<RefCell<BusState>>,
    clock: Clock,
}

impl SimBus {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BusState {
                scl: Level::High,
                sda_out: Level::High,
                sda_direction: Direction::Input,
                device_low: false,
                acking: true,
                in_frame: false,
                bits: 0,
                shift: 0,
                ack_clock: false,
                contended: false,
                events: Vec::new(),
            })),
            clock: Rc::new(Cell::new(0)),
        }
    }

    pub fn scl(&self) -> SimScl {
        SimScl {
            state: self.state.clone(),
        }
    }

    pub fn sda(&self) -> SimSda {
        SimSda {
            state: self.state.clone(),
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay::new(self.clock.clone())
    }

    /// Make the device acknowledge (or ignore) further bytes
    pub fn set_acking(&self, acking: bool) {
        self.state.borrow_mut().acking = acking;
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    /// Whether the master ever drove data high against the device
    pub fn contended(&self) -> bool {
        self.state.borrow().contended
    }

    /// Both lines high and no frame open
    pub fn is_idle(&self) -> bool {
        let state = self.state.borrow();
        state.scl.is_high() && state.sda().is_high() && !state.in_frame
    }

    pub fn now_us(&self) -> u64 {
        self.clock.get() / 1_000
    }
}

/// Simulated clock line (push-pull output)
pub struct SimScl {
    state: Rc<RefCell<BusState>>,
}

impl OutputPin for SimScl {
    fn set_high(&mut self) {
        self.state.borrow_mut().set_scl(Level::High);
    }

    fn set_low(&mut self) {
        self.state.borrow_mut().set_scl(Level::Low);
    }

    fn is_set_high(&self) -> bool {
        self.state.borrow().scl.is_high()
    }
}

/// Simulated open-drain data line
pub struct SimSda {
    state: Rc<RefCell<BusState>>,
}

impl OutputPin for SimSda {
    fn set_high(&mut self) {
        self.state.borrow_mut().update_sda(|s| s.sda_out = Level::High);
    }

    fn set_low(&mut self) {
        self.state.borrow_mut().update_sda(|s| s.sda_out = Level::Low);
    }

    fn is_set_high(&self) -> bool {
        self.state.borrow().sda_out.is_high()
    }
}

impl InputPin for SimSda {
    fn is_high(&self) -> bool {
        self.state.borrow().sda().is_high()
    }
}

impl FlexPin for SimSda {
    fn set_direction(&mut self, direction: Direction) {
        self.state
            .borrow_mut()
            .update_sda(|s| s.sda_direction = direction);
    }
}

// ---------------------------------------------------------------------------
// Single-wire sensor
// ---------------------------------------------------------------------------

/// Shortest request pulse the simulated sensor answers (ns)
const MIN_REQUEST_NS: u64 = 18_000_000;

/// Sensor data line replaying a scripted waveform
///
/// The waveform is a list of `(level, duration_us)` segments played from
/// the moment the driver releases the line after a long enough request
/// pulse. Before a request and after the waveform ends the pull-up holds
/// the line high.
pub struct SimSensorLine {
    clock: Clock,
    waveform: Vec<(Level, u32)>,
    direction: Direction,
    out: Level,
    low_since: Option<u64>,
    response_at: Option<u64>,
    requests: u32,
}

impl SimSensorLine {
    pub fn new(clock: Clock, waveform: Vec<(Level, u32)>) -> Self {
        Self {
            clock,
            waveform,
            direction: Direction::Input,
            out: Level::High,
            low_since: None,
            response_at: None,
            requests: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of request pulses the sensor accepted
    pub fn requests(&self) -> u32 {
        self.requests
    }

    fn begin_low_pulse(&mut self) {
        if self.direction == Direction::Output && self.out == Level::Low {
            self.low_since.get_or_insert(self.clock.get());
        }
    }

    fn end_low_pulse(&mut self) {
        if let Some(since) = self.low_since.take() {
            let now = self.clock.get();
            if now - since >= MIN_REQUEST_NS {
                self.response_at = Some(now);
                self.requests += 1;
            }
        }
    }
}

impl OutputPin for SimSensorLine {
    fn set_high(&mut self) {
        self.out = Level::High;
        self.end_low_pulse();
    }

    fn set_low(&mut self) {
        self.out = Level::Low;
        self.begin_low_pulse();
    }

    fn is_set_high(&self) -> bool {
        self.out.is_high()
    }
}

impl InputPin for SimSensorLine {
    fn is_high(&self) -> bool {
        if self.direction == Direction::Output {
            return self.out.is_high();
        }

        let Some(start) = self.response_at else {
            return true;
        };
        let mut elapsed = self.clock.get() - start;
        for &(level, duration_us) in &self.waveform {
            let duration = u64::from(duration_us) * 1_000;
            if elapsed < duration {
                return level.is_high();
            }
            elapsed -= duration;
        }
        true
    }
}

impl FlexPin for SimSensorLine {
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        match direction {
            Direction::Output => self.begin_low_pulse(),
            Direction::Input => self.end_low_pulse(),
        }
    }
}

/// DHT11 response to one request transmitting `bytes`
///
/// Handshake of 30 µs high, 80 µs low, 80 µs high, then per bit a 50 µs low
/// gap followed by a 26 µs (`0`) or 70 µs (`1`) high pulse, and a final
/// 50 µs low before the sensor lets go.
pub fn dht11_waveform(bytes: [u8; 5]) -> Vec<(Level, u32)> {
    dht11_waveform_with(bytes, 26, 70)
}

/// Like [`dht11_waveform`] with explicit high-pulse widths for `0` and `1`
pub fn dht11_waveform_with(bytes: [u8; 5], zero_us: u32, one_us: u32) -> Vec<(Level, u32)> {
    let mut waveform = vec![(Level::High, 30), (Level::Low, 80), (Level::High, 80)];
    for byte in bytes {
        for bit in (0..8).rev() {
            let high_us = if byte & (1 << bit) != 0 { one_us } else { zero_us };
            waveform.push((Level::Low, 50));
            waveform.push((Level::High, high_us));
        }
    }
    waveform.push((Level::Low, 50));
    waveform
}
