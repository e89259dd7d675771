//! GPIO wrappers and allocation
//!
//! Wraps `embassy-rp` pins in the `tetrad-hal` traits and tracks which
//! GPIOs the configuration has claimed, so a pin wired to two functions
//! is caught before anything is driven.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use heapless::FnvIndexSet;
use tetrad_core::config::hardware::{PinConfig, MAX_GPIO};
use tetrad_core::config::DeviceConfig;
use tetrad_hal::{InputPin, OutputPin};

use crate::pins::PinError;

/// Number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = MAX_GPIO as usize + 1;

/// Push-pull output
pub struct RpOutput(Output<'static>);

impl RpOutput {
    /// Configure `pin` as an output, starting at `initial`
    pub fn new(pin: Peri<'static, AnyPin>, initial: bool) -> Self {
        Self(Output::new(pin, Level::from(initial)))
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Digital input
pub struct RpInput(Input<'static>);

impl RpInput {
    /// Configure `pin` as an input, with the pull-up enabled if requested
    pub fn new(pin: Peri<'static, AnyPin>, pull_up: bool) -> Self {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Self(Input::new(pin, pull))
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a configured pin
    ///
    /// Fails if the number is out of range, belongs to the wireless
    /// chip, or was already claimed.
    pub fn allocate(&mut self, pin: &PinConfig) -> Result<(), PinError> {
        if usize::from(pin.pin) >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if pin.is_reserved() {
            return Err(PinError::Reserved);
        }
        if self.allocated.contains(&pin.pin) {
            return Err(PinError::AlreadyTaken);
        }
        self.allocated
            .insert(pin.pin)
            .map_err(|_| PinError::InvalidPin)?;
        Ok(())
    }

    /// Claim every pin a device configuration uses
    ///
    /// Returns the first offending pin number with the error.
    pub fn allocate_device(&mut self, config: &DeviceConfig) -> Result<(), (u8, PinError)> {
        for pin in config.display.pins().chain(core::iter::once(config.button.pin)) {
            self.allocate(&pin).map_err(|e| (pin.pin, e))?;
        }
        Ok(())
    }

    /// Check if a pin is allocated
    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    /// Get the number of allocated pins
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator() {
        let mut alloc = GpioAllocator::new();

        assert!(alloc.allocate(&PinConfig::new(11)).is_ok());
        assert!(alloc.is_allocated(11));

        // Can't allocate same pin twice
        assert_eq!(
            alloc.allocate(&PinConfig::new(11)),
            Err(PinError::AlreadyTaken)
        );

        assert!(alloc.allocate(&PinConfig::new(12)).is_ok());
        assert_eq!(alloc.allocated_count(), 2);
    }

    #[test]
    fn test_reserved_and_range() {
        let mut alloc = GpioAllocator::new();
        assert_eq!(alloc.allocate(&PinConfig::new(23)), Err(PinError::Reserved));
        assert_eq!(alloc.allocate(&PinConfig::new(30)), Err(PinError::InvalidPin));
    }

    #[test]
    fn test_default_device_has_no_conflicts() {
        let mut alloc = GpioAllocator::new();
        assert!(alloc.allocate_device(&DeviceConfig::default()).is_ok());
        assert_eq!(alloc.allocated_count(), 17);
    }

    #[test]
    fn test_duplicate_device_pin_reported() {
        let mut config = DeviceConfig::default();
        config.button.pin = PinConfig::new(2);
        let mut alloc = GpioAllocator::new();
        assert_eq!(
            alloc.allocate_device(&config),
            Err((2, PinError::AlreadyTaken))
        );
    }
}
