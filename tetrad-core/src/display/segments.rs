//! Seven-segment character patterns
//!
//! Segment naming follows the usual convention:
//!
//! ```text
//!    aaa
//!   f   b
//!   f   b
//!    ggg
//!   e   c
//!   e   c
//!    ddd  (dp)
//! ```
//!
//! Patterns are stored as a bitmask with `a` in bit 0 through `g` in bit 6.
//! The decimal point is not part of a pattern; it is a per-slot flag in the
//! display buffer.

/// One of the seven bar segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    /// All segments in wiring order
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    /// Bit position within a [`SegmentPattern`]
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

/// Lit segments for one character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPattern(u8);

/// Renderable characters and their patterns
const TABLE: &[(char, u8)] = &[
    (' ', 0x00),
    ('0', 0x3F),
    ('1', 0x06),
    ('2', 0x5B),
    ('3', 0x4F),
    ('4', 0x66),
    ('5', 0x6D),
    ('6', 0x7D),
    ('7', 0x07),
    ('8', 0x7F),
    ('9', 0x6F),
    ('A', 0x77),
    ('B', 0x7C), // lowercase b
    ('C', 0x39),
    ('E', 0x79),
    ('F', 0x71),
    ('H', 0x76),
    ('I', 0x30),
    ('L', 0x38),
    ('N', 0x53),
    ('O', 0x3F),
    ('P', 0x73),
    ('R', 0x50), // lowercase r
    ('S', 0x6D),
    ('U', 0x1C), // lowercase u
    ('W', 0x2E),
    ('-', 0x40),
];

impl SegmentPattern {
    /// All segments off
    pub const BLANK: SegmentPattern = SegmentPattern(0);

    /// All seven segments lit
    pub const FULL: SegmentPattern = SegmentPattern(0x7F);

    /// Build from a raw bitmask (bits above `g` are dropped)
    pub const fn from_bits(bits: u8) -> Self {
        SegmentPattern(bits & 0x7F)
    }

    /// Raw bitmask
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Look up a character, case-folded
    ///
    /// Returns `None` for characters outside the table.
    pub fn lookup(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        TABLE
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|&(_, bits)| SegmentPattern(bits))
    }

    /// Pattern for a character, falling back to blank
    pub fn for_char(c: char) -> Self {
        Self::lookup(c).unwrap_or(Self::BLANK)
    }

    /// Whether a segment is lit
    pub const fn is_on(self, segment: Segment) -> bool {
        self.0 & (1 << segment.bit()) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Active-low reference rows, segment order a..g (0 = lit)
    const REFERENCE: &[(char, [u8; 7])] = &[
        (' ', [1, 1, 1, 1, 1, 1, 1]),
        ('0', [0, 0, 0, 0, 0, 0, 1]),
        ('1', [1, 0, 0, 1, 1, 1, 1]),
        ('2', [0, 0, 1, 0, 0, 1, 0]),
        ('3', [0, 0, 0, 0, 1, 1, 0]),
        ('4', [1, 0, 0, 1, 1, 0, 0]),
        ('5', [0, 1, 0, 0, 1, 0, 0]),
        ('6', [0, 1, 0, 0, 0, 0, 0]),
        ('7', [0, 0, 0, 1, 1, 1, 1]),
        ('8', [0, 0, 0, 0, 0, 0, 0]),
        ('9', [0, 0, 0, 0, 1, 0, 0]),
        ('A', [0, 0, 0, 1, 0, 0, 0]),
        ('B', [1, 1, 0, 0, 0, 0, 0]),
        ('C', [0, 1, 1, 0, 0, 0, 1]),
        ('E', [0, 1, 1, 0, 0, 0, 0]),
        ('F', [0, 1, 1, 1, 0, 0, 0]),
        ('H', [1, 0, 0, 1, 0, 0, 0]),
        ('I', [1, 1, 1, 1, 0, 0, 1]),
        ('L', [1, 1, 1, 0, 0, 0, 1]),
        ('N', [0, 0, 1, 1, 0, 1, 0]),
        ('O', [0, 0, 0, 0, 0, 0, 1]),
        ('P', [0, 0, 1, 1, 0, 0, 0]),
        ('S', [0, 1, 0, 0, 1, 0, 0]),
        ('U', [1, 1, 0, 0, 0, 1, 1]),
        ('W', [1, 0, 0, 0, 1, 0, 1]),
        ('-', [1, 1, 1, 1, 1, 1, 0]),
    ];

    #[test]
    fn test_table_matches_reference() {
        for (c, row) in REFERENCE {
            let pattern = SegmentPattern::lookup(*c).unwrap();
            for (segment, level) in Segment::ALL.iter().zip(row.iter()) {
                assert_eq!(
                    pattern.is_on(*segment),
                    *level == 0,
                    "char {:?} segment {:?}",
                    c,
                    segment
                );
            }
        }
    }

    #[test]
    fn test_lowercase_r() {
        let r = SegmentPattern::for_char('r');
        assert!(r.is_on(Segment::E));
        assert!(r.is_on(Segment::G));
        assert_eq!(r.bits().count_ones(), 2);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(SegmentPattern::for_char('h'), SegmentPattern::for_char('H'));
        assert_eq!(SegmentPattern::for_char('e'), SegmentPattern::for_char('E'));
    }

    #[test]
    fn test_unknown_is_blank() {
        assert_eq!(SegmentPattern::for_char('Z'), SegmentPattern::BLANK);
        assert_eq!(SegmentPattern::for_char('.'), SegmentPattern::BLANK);
        assert_eq!(SegmentPattern::for_char('°'), SegmentPattern::BLANK);
        assert_eq!(SegmentPattern::lookup('K'), None);
    }

    #[test]
    fn test_eight_lights_everything() {
        assert_eq!(SegmentPattern::for_char('8'), SegmentPattern::FULL);
        assert_eq!(SegmentPattern::FULL.bits().count_ones(), 7);
    }

    proptest! {
        #[test]
        fn prop_unknown_chars_are_blank(c in any::<char>()) {
            let pattern = SegmentPattern::for_char(c);
            if SegmentPattern::lookup(c).is_none() {
                prop_assert_eq!(pattern, SegmentPattern::BLANK);
            }
            prop_assert!(pattern.bits() <= 0x7F);
        }
    }
}
