//! RP2040-specific HAL for the station firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `hygro-hal` traits:
//!
//! - Push-pull and open-drain style GPIO lines
//! - Dynamic pin allocation for config-driven setup

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::{OpenDrainLine, PushPullLine};
pub use pins::{PinBank, PinError};
