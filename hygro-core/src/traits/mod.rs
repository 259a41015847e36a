//! Hardware abstraction traits
//!
//! These traits define the interface between the station logic and the
//! protocol drivers in `hygro-drivers`.

pub mod display;
pub mod sensor;

pub use display::{DisplayError, TextDisplay};
pub use sensor::{HumiditySensor, SensorError};
