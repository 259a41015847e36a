//! Character display drivers

pub mod hd44780;

pub use hd44780::{glyph, nibble_frames, CharacterLcd, UnitKind};
