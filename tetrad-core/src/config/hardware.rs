//! Hardware configuration types
//!
//! Pin assignments for the display matrix and the button.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest GPIO number on the RP2040
pub const MAX_GPIO: u8 = 29;

/// GPIOs wired to the CYW43 radio on the Pico W
pub const RESERVED_GPIOS: [u8; 4] = [23, 24, 25, 29];

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low input with pull-up
    pub const fn pulled_up_low(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// Whether the radio owns this GPIO
    pub fn is_reserved(&self) -> bool {
        RESERVED_GPIOS.contains(&self.pin)
    }
}

/// Multiplexed display wiring
///
/// Segment cathodes are driven low to light a segment; digit and
/// indicator anodes are driven high to enable them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayPinsConfig {
    /// Segment lines A through G
    pub segments: [PinConfig; 7],
    /// Decimal point segment line
    pub decimal_point: PinConfig,
    /// Digit enable lines, left to right
    pub digits: [PinConfig; 4],
    pub colon_anode: PinConfig,
    pub colon_cathode: PinConfig,
    pub degree_anode: PinConfig,
    pub degree_cathode: PinConfig,
    /// Time each digit stays enabled per refresh pass
    pub dwell_us: u32,
}

impl DisplayPinsConfig {
    /// Every GPIO this display uses
    pub fn pins(&self) -> impl Iterator<Item = PinConfig> + '_ {
        self.segments
            .iter()
            .chain(core::iter::once(&self.decimal_point))
            .chain(self.digits.iter())
            .chain([
                &self.colon_anode,
                &self.colon_cathode,
                &self.degree_anode,
                &self.degree_cathode,
            ])
            .copied()
    }
}

impl Default for DisplayPinsConfig {
    fn default() -> Self {
        Self {
            segments: [
                PinConfig::new(2),
                PinConfig::new(3),
                PinConfig::new(4),
                PinConfig::new(5),
                PinConfig::new(6),
                PinConfig::new(7),
                PinConfig::new(8),
            ],
            decimal_point: PinConfig::new(9),
            digits: [
                PinConfig::new(18),
                PinConfig::new(19),
                PinConfig::new(21),
                PinConfig::new(12),
            ],
            colon_anode: PinConfig::new(20),
            colon_cathode: PinConfig::new(13),
            degree_anode: PinConfig::new(11),
            degree_cathode: PinConfig::new(10),
            dwell_us: 2500,
        }
    }
}

/// Push button wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Input pin; inverted means pressed reads low
    pub pin: PinConfig,
    /// Time the input must stay asserted before a press counts
    pub debounce_ms: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            pin: PinConfig::pulled_up_low(22),
            debounce_ms: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_display_pins_unique() {
        let config = DisplayPinsConfig::default();
        let mut seen = [false; 30];
        for pin in config.pins() {
            assert!(!seen[pin.pin as usize], "gpio{} used twice", pin.pin);
            seen[pin.pin as usize] = true;
        }
        assert_eq!(config.pins().count(), 16);
    }

    #[test]
    fn test_defaults_avoid_radio_pins() {
        let display = DisplayPinsConfig::default();
        assert!(display.pins().all(|p| !p.is_reserved()));
        assert!(!ButtonConfig::default().pin.is_reserved());
    }
}
