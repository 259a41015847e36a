//! Text display trait for character displays

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Display did not acknowledge a bus transfer before the deadline
    AckTimeout,
    /// Text is wider than the display row
    RowOverflow,
    /// Row index beyond the display's row count
    InvalidRow,
}

/// Trait for row-oriented character displays
///
/// The station only ever writes whole rows; cursor handling and glyph
/// mapping stay inside the driver.
pub trait TextDisplay {
    /// Run the controller initialization sequence
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Replace the contents of a row
    ///
    /// - `row`: Row number (0-based)
    /// - `text`: Text to show; the rest of the row is blanked
    fn write_row(&mut self, row: u8, text: &str) -> Result<(), DisplayError>;
}
