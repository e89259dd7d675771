//! Display buffer
//!
//! Four character slots plus the colon and degree indicators. Text writes
//! land here; the multiplexer reads from here on every refresh pass.

use super::segments::SegmentPattern;
use crate::traits::SegmentDisplay;

/// Number of digits on the display
pub const DIGIT_COUNT: usize = 4;

/// One digit position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplaySlot {
    /// Character (already case-folded)
    pub character: char,
    /// Decimal point lit after this digit
    pub decimal_point: bool,
}

impl DisplaySlot {
    /// An unlit slot
    pub const BLANK: DisplaySlot = DisplaySlot {
        character: ' ',
        decimal_point: false,
    };

    /// Create a slot
    pub const fn new(character: char, decimal_point: bool) -> Self {
        Self {
            character,
            decimal_point,
        }
    }

    /// Segment pattern for this slot's character
    pub fn pattern(&self) -> SegmentPattern {
        SegmentPattern::for_char(self.character)
    }
}

impl Default for DisplaySlot {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Contents of the display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayBuffer {
    slots: [DisplaySlot; DIGIT_COUNT],
    colon: bool,
    degree: bool,
}

impl DisplayBuffer {
    /// Create an empty buffer with both indicators off
    pub const fn new() -> Self {
        Self {
            slots: [DisplaySlot::BLANK; DIGIT_COUNT],
            colon: false,
            degree: false,
        }
    }

    /// Write text into the slots
    ///
    /// A `.` directly after a character becomes that slot's decimal point
    /// and uses no slot of its own. Input past four visible characters is
    /// ignored and unused slots are blanked. `None` indicators keep their
    /// previous state.
    pub fn write(&mut self, text: &str, colon: Option<bool>, degree: Option<bool>) {
        self.slots = [DisplaySlot::BLANK; DIGIT_COUNT];

        let mut chars = text.chars().peekable();
        let mut pos = 0;
        while pos < DIGIT_COUNT {
            let Some(c) = chars.next() else { break };
            let decimal_point = chars.next_if_eq(&'.').is_some();
            self.slots[pos] = DisplaySlot::new(c.to_ascii_uppercase(), decimal_point);
            pos += 1;
        }

        if let Some(colon) = colon {
            self.colon = colon;
        }
        if let Some(degree) = degree {
            self.degree = degree;
        }
    }

    /// Blank every slot and turn both indicators off
    pub fn clear(&mut self) {
        self.write("", Some(false), Some(false));
    }

    /// Current slots, left to right
    pub fn slots(&self) -> &[DisplaySlot; DIGIT_COUNT] {
        &self.slots
    }

    /// Slot at a digit position
    pub fn slot(&self, index: usize) -> DisplaySlot {
        self.slots.get(index).copied().unwrap_or(DisplaySlot::BLANK)
    }

    /// Colon indicator state
    pub fn colon(&self) -> bool {
        self.colon
    }

    /// Degree indicator state
    pub fn degree(&self) -> bool {
        self.degree
    }
}

impl SegmentDisplay for DisplayBuffer {
    fn write(&mut self, text: &str, colon: Option<bool>, degree: Option<bool>) {
        DisplayBuffer::write(self, text, colon, degree);
    }

    fn clear(&mut self) {
        DisplayBuffer::clear(self);
    }
}
