//! GPIO push button
//!
//! Reads a button wired to a GPIO input. Buttons to ground with a
//! pull-up read low when pressed; configure those as inverted.

use tetrad_core::traits::ButtonInput;
use tetrad_hal::{ActiveLevel, InputPin};

/// GPIO push button
pub struct GpioButton<P> {
    pin: P,
    level: ActiveLevel,
}

impl<P: InputPin> GpioButton<P> {
    /// Create a button
    ///
    /// # Arguments
    /// - `pin`: The GPIO input
    /// - `inverted`: If true, pressed reads LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            level: ActiveLevel::from_inverted(inverted),
        }
    }

    /// Create a button that reads high when pressed
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a button that reads low when pressed
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: InputPin> ButtonInput for GpioButton<P> {
    fn is_pressed(&mut self) -> bool {
        self.level.read(&self.pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO input for testing
    struct MockPin {
        high: bool,
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low_button() {
        let mut button = GpioButton::new_active_low(MockPin { high: true });
        assert!(!button.is_pressed());

        button.pin.high = false;
        assert!(button.is_pressed());
    }

    #[test]
    fn test_active_high_button() {
        let mut button = GpioButton::new_active_high(MockPin { high: false });
        assert!(!button.is_pressed());

        button.pin.high = true;
        assert!(button.is_pressed());
    }
}
