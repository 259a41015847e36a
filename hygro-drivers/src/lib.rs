//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in hygro-core, built on the GPIO traits from hygro-hal and the
//! `embedded_hal::delay::DelayNs` timing primitive:
//!
//! - Two-wire bus master (bit-banged clock/data framing)
//! - HD44780 character display behind a PCF8574 expander
//! - DHT11 single-wire humidity/temperature sensor
//!
//! Every wait on a line level is bounded and fails with a typed timeout.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod display;
pub mod sensor;
pub mod wait;

#[cfg(test)]
pub(crate) mod sim;
