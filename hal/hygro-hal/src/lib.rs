//! Hygro Hardware Abstraction Layer
//!
//! This crate defines the GPIO capability that both bit-banged protocol
//! engines are written against. Chip-specific crates implement it for real
//! pins; host tests implement it with simulated lines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hygro-drivers (two-wire, LCD, DHT11)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hygro-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  hygro-hal-   │       │  simulated    │
//! │    rp2040     │       │  test lines   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Push-pull output (bus clock)
//! - [`gpio::InputPin`] - Level sampling
//! - [`gpio::FlexPin`] - Bidirectional line (bus data, sensor data)
//!
//! Timing is not abstracted here: drivers take any
//! `embedded_hal::delay::DelayNs` implementation.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

// Re-export key traits at crate root for convenience
pub use gpio::{Direction, FlexPin, InputPin, Level, OutputPin};
