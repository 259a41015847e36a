//! HD44780 character display behind a PCF8574 I/O expander
//!
//! The expander maps its eight outputs onto the controller in 4-bit mode:
//!
//! ```text
//! P7 P6 P5 P4 | P3        P2      P1   P0
//! D7 D6 D5 D4 | backlight enable  R/W  RS
//! ```
//!
//! Each command or data byte is one bus frame: the address byte followed by
//! four expander writes, upper nibble first, each nibble latched by an
//! enable pulse (asserted, then deasserted).

use embedded_hal::delay::DelayNs;
use hygro_core::config::DisplayConfig;
use hygro_core::traits::{DisplayError, TextDisplay};
use hygro_hal::{FlexPin, OutputPin};

use crate::bus::{BusError, TwoWireMaster};

/// Expander bit driving the register-select line (set for character data)
const RS: u8 = 0x01;
/// Expander bit driving the enable line
const ENABLE: u8 = 0x04;
/// Expander bit switching the backlight, kept on for every write
const BACKLIGHT: u8 = 0x08;

/// Controller instructions
pub mod command {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    /// Entry mode: cursor moves right after each character
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    /// Display on, cursor and blink off
    pub const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
    /// Function set: 4-bit interface, two lines, 5x8 font
    pub const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
    /// Set display RAM address (OR the address into the low seven bits)
    pub const SET_DDRAM_ADDRESS: u8 = 0x80;
}

/// Power-on initialization sequence
pub const INIT_SEQUENCE: [u8; 5] = [
    command::RETURN_HOME,
    command::FUNCTION_SET_4BIT_2LINE,
    command::DISPLAY_ON_CURSOR_OFF,
    command::ENTRY_MODE_INCREMENT,
    command::CLEAR_DISPLAY,
];

/// Display RAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Controller glyph for the degree sign (ROM code A00)
pub const DEGREE_GLYPH: u8 = 0xDF;

/// Glyph shown for characters the controller ROM lacks
pub const UNKNOWN_GLYPH: u8 = b'?';

/// Whether a unit goes to the instruction or the data register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnitKind {
    Command,
    Data,
}

impl UnitKind {
    /// Control nibble with enable asserted (0x0C command, 0x0D data)
    pub const fn enable_high(self) -> u8 {
        self.enable_low() | ENABLE
    }

    /// Control nibble with enable deasserted (0x08 command, 0x09 data)
    pub const fn enable_low(self) -> u8 {
        match self {
            UnitKind::Command => BACKLIGHT,
            UnitKind::Data => BACKLIGHT | RS,
        }
    }
}

/// The four expander writes that transfer `value`
///
/// Upper nibble with enable high, upper nibble with enable low, then the
/// same for the lower nibble.
pub const fn nibble_frames(value: u8, kind: UnitKind) -> [u8; 4] {
    let upper = value & 0xF0;
    let lower = (value << 4) & 0xF0;
    [
        upper | kind.enable_high(),
        upper | kind.enable_low(),
        lower | kind.enable_high(),
        lower | kind.enable_low(),
    ]
}

/// Map a character to its controller glyph code
///
/// Printable ASCII maps to itself and `°` to the ROM degree sign; anything
/// else is shown as `?`.
pub fn glyph(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '°' => DEGREE_GLYPH,
        _ => UNKNOWN_GLYPH,
    }
}

/// HD44780 display on a PCF8574 backpack
pub struct CharacterLcd<SCL, SDA, D> {
    bus: TwoWireMaster<SCL, SDA, D>,
    config: DisplayConfig,
}

impl<SCL, SDA, D> CharacterLcd<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: FlexPin,
    D: DelayNs,
{
    /// Create a display driver on top of a bus master
    ///
    /// The controller is not touched until [`TextDisplay::init`] is called.
    pub fn new(bus: TwoWireMaster<SCL, SDA, D>, config: DisplayConfig) -> Self {
        Self { bus, config }
    }

    /// Send one unit as a single bus frame
    ///
    /// The bus is released with a stop condition even if a write is not
    /// acknowledged.
    fn send_unit(&mut self, value: u8, kind: UnitKind) -> Result<(), BusError> {
        let DisplayConfig {
            enable_pulse_ms,
            latch_settle_ms,
            ..
        } = self.config;

        self.bus.transaction(self.config.write_address(), |bus| {
            for pair in nibble_frames(value, kind).chunks_exact(2) {
                bus.write_acked(pair[0])?;
                bus.delay_mut().delay_ms(enable_pulse_ms);
                bus.write_acked(pair[1])?;
                bus.delay_mut().delay_ms(latch_settle_ms);
            }
            Ok(())
        })
    }

    /// Send an instruction to the controller
    pub fn send_command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        Ok(self.send_unit(cmd, UnitKind::Command)?)
    }

    /// Write one character code at the cursor
    pub fn send_data(&mut self, data: u8) -> Result<(), DisplayError> {
        Ok(self.send_unit(data, UnitKind::Data)?)
    }

    /// Move the cursor to `col` of `row`
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        if row >= self.config.rows {
            return Err(DisplayError::InvalidRow);
        }
        if col >= self.config.columns {
            return Err(DisplayError::RowOverflow);
        }
        let offset = ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidRow)?;
        self.send_command(command::SET_DDRAM_ADDRESS | (offset + col))
    }

    /// Write raw character codes at the cursor
    ///
    /// Stops at the first NUL byte or the end of the slice. Nothing is
    /// truncated or wrapped; long input runs into display RAM past the
    /// visible row.
    pub fn send_string(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        for &byte in bytes.iter().take_while(|&&b| b != 0) {
            self.send_data(byte)?;
        }
        Ok(())
    }
}

impl<SCL, SDA, D> TextDisplay for CharacterLcd<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: FlexPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        for cmd in INIT_SEQUENCE {
            self.send_command(cmd)?;
        }
        Ok(())
    }

    fn write_row(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        if row >= self.config.rows {
            return Err(DisplayError::InvalidRow);
        }
        let width = text.chars().count();
        if width > self.config.columns as usize {
            return Err(DisplayError::RowOverflow);
        }

        self.set_cursor(row, 0)?;
        for c in text.chars() {
            self.send_data(glyph(c))?;
        }
        // Blank out whatever a longer previous row left behind
        for _ in width..self.config.columns as usize {
            self.send_data(b' ')?;
        }
        Ok(())
    }
}
