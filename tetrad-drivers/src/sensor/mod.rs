//! Temperature sensor drivers

pub mod onchip;

pub use onchip::{AdcReader, OnChipTemperature};
