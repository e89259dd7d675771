//! RP2040-specific HAL for the clock firmware
//!
//! Implements the shared `tetrad-hal` traits over `embassy-rp`, plus the
//! RP2040-specific pieces the firmware needs:
//!
//! - Config-driven pin claiming by GPIO number
//! - Pin conflict detection before anything is driven
//! - The on-chip temperature ADC channel

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pins;

pub use adc::TemperatureChannel;
pub use gpio::{GpioAllocator, RpInput, RpOutput};
pub use pins::{PinBank, PinError, RadioPins, RemainingPeripherals};
