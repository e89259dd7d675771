//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tetrad-core, written against the pin traits of tetrad-hal:
//!
//! - Multiplexed 4-digit 7-segment display
//! - Push button input
//! - RP2040 on-chip temperature sensor

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod display;
pub mod input;
pub mod sensor;

pub use display::{DisplayLines, Line, MultiplexDisplay};
pub use input::GpioButton;
pub use sensor::{AdcReader, OnChipTemperature};
