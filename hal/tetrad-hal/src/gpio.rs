//! GPIO pin abstractions
//!
//! The display is common-anode: a segment lights when its line is driven
//! low, a digit is enabled when its anode is driven high. Drivers talk in
//! logical terms (on/off) and let [`ActiveLevel`] decide the electrical level.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Which electrical level means "active" for a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Logical on drives the pin high
    #[default]
    High,
    /// Logical on drives the pin low
    Low,
}

impl ActiveLevel {
    /// Build from an "inverted" config flag
    pub const fn from_inverted(inverted: bool) -> Self {
        if inverted {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        }
    }

    /// Electrical level for a logical state
    pub const fn level_for(self, active: bool) -> bool {
        match self {
            ActiveLevel::High => active,
            ActiveLevel::Low => !active,
        }
    }

    /// Drive `pin` to the logical state `active`
    pub fn drive<P: OutputPin + ?Sized>(self, pin: &mut P, active: bool) {
        pin.set_state(self.level_for(active));
    }

    /// Read the logical state of an input
    pub fn read<P: InputPin + ?Sized>(self, pin: &P) -> bool {
        self.level_for(pin.is_high())
    }
}
