//! Sensor drivers

pub mod dht11;

pub use dht11::Dht11;
