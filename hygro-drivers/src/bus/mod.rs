//! Two-wire bus drivers

pub mod two_wire;

pub use two_wire::{BusError, TwoWireMaster};
