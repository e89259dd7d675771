//! Multiplexed 4-digit 7-segment display
//!
//! Common-anode wiring: the seven segment cathodes and the decimal point
//! are shared by all digits, each digit has its own anode. Only one digit
//! is enabled at a time; [`MultiplexDisplay::refresh`] walks all four,
//! holding each for the dwell time, and must run continuously.
//!
//! Colon and degree LEDs have a dedicated anode/cathode pair each and are
//! updated once per pass, while the first digit is enabled.
//!
//! Writes only touch the in-memory [`DisplayBuffer`]; `refresh` is the
//! only path that drives pins.

use embedded_hal::delay::DelayNs;
use tetrad_core::display::{DisplayBuffer, Segment};
use tetrad_core::traits::SegmentDisplay;
use tetrad_hal::{ActiveLevel, OutputPin};

/// One output line with its active level
pub struct Line<P> {
    pin: P,
    level: ActiveLevel,
}

impl<P: OutputPin> Line<P> {
    /// Create a line
    pub fn new(pin: P, level: ActiveLevel) -> Self {
        Self { pin, level }
    }

    /// A cathode: on means driven low, unless the wiring is inverted
    pub fn cathode(pin: P, inverted: bool) -> Self {
        Self::new(pin, ActiveLevel::from_inverted(!inverted))
    }

    /// An anode: on means driven high, unless the wiring is inverted
    pub fn anode(pin: P, inverted: bool) -> Self {
        Self::new(pin, ActiveLevel::from_inverted(inverted))
    }

    /// Switch the line on or off
    pub fn set(&mut self, on: bool) {
        self.level.drive(&mut self.pin, on);
    }

    /// Logical state of the line
    pub fn is_on(&self) -> bool {
        self.level.level_for(self.pin.is_set_high())
    }

    /// The underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// Every line the display is wired to
pub struct DisplayLines<P> {
    /// Segment cathodes A through G
    pub segments: [Line<P>; 7],
    pub decimal_point: Line<P>,
    /// Digit anodes, left to right
    pub digits: [Line<P>; 4],
    pub colon_anode: Line<P>,
    pub colon_cathode: Line<P>,
    pub degree_anode: Line<P>,
    pub degree_cathode: Line<P>,
}

impl<P: OutputPin> DisplayLines<P> {
    fn set_colon(&mut self, on: bool) {
        self.colon_anode.set(on);
        self.colon_cathode.set(on);
    }

    fn set_degree(&mut self, on: bool) {
        self.degree_anode.set(on);
        self.degree_cathode.set(on);
    }

    fn all_off(&mut self) {
        for digit in self.digits.iter_mut() {
            digit.set(false);
        }
        for segment in self.segments.iter_mut() {
            segment.set(false);
        }
        self.decimal_point.set(false);
        self.set_colon(false);
        self.set_degree(false);
    }
}

/// Multiplexed display driver
pub struct MultiplexDisplay<P, D> {
    lines: DisplayLines<P>,
    delay: D,
    dwell_us: u32,
    buffer: DisplayBuffer,
}

impl<P: OutputPin, D: DelayNs> MultiplexDisplay<P, D> {
    /// Create a driver with every line switched off
    pub fn new(lines: DisplayLines<P>, delay: D, dwell_us: u32) -> Self {
        let mut display = Self {
            lines,
            delay,
            dwell_us,
            buffer: DisplayBuffer::new(),
        };
        display.lines.all_off();
        display
    }

    /// Run one multiplexing pass over all four digits
    ///
    /// Takes about four dwell times. The only wait is the dwell delay.
    pub fn refresh(&mut self) {
        let lines = &mut self.lines;

        for (index, slot) in self.buffer.slots().iter().enumerate() {
            for digit in lines.digits.iter_mut() {
                digit.set(false);
            }

            let pattern = slot.pattern();
            for (segment, line) in Segment::ALL.iter().zip(lines.segments.iter_mut()) {
                line.set(pattern.is_on(*segment));
            }
            lines.decimal_point.set(slot.decimal_point);

            lines.digits[index].set(true);

            if index == 0 {
                lines.set_colon(self.buffer.colon());
                lines.set_degree(self.buffer.degree());
            }

            self.delay.delay_us(self.dwell_us);
        }
    }

    /// Current buffer contents
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// The wired lines
    pub fn lines(&self) -> &DisplayLines<P> {
        &self.lines
    }
}

impl<P: OutputPin, D: DelayNs> SegmentDisplay for MultiplexDisplay<P, D> {
    fn write(&mut self, text: &str, colon: Option<bool>, degree: Option<bool>) {
        self.buffer.write(text, colon, degree);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    type Log = Rc<RefCell<Vec<(u8, bool)>>>;

    /// Mock GPIO pin recording every level change into a shared log
    struct MockPin {
        gpio: u8,
        high: bool,
        log: Log,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.log.borrow_mut().push((self.gpio, true));
        }

        fn set_low(&mut self) {
            self.high = false;
            self.log.borrow_mut().push((self.gpio, false));
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct NoopDelay {
        total_us: u64,
    }

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us += u64::from(ns) / 1000;
        }

        fn delay_us(&mut self, us: u32) {
            self.total_us += u64::from(us);
        }
    }

    const SEGMENTS: [u8; 7] = [2, 3, 4, 5, 6, 7, 8];
    const DP: u8 = 9;
    const DIGITS: [u8; 4] = [18, 19, 21, 12];
    const COLON_ANODE: u8 = 20;
    const COLON_CATHODE: u8 = 13;
    const DEGREE_ANODE: u8 = 11;
    const DEGREE_CATHODE: u8 = 10;

    fn display() -> (MultiplexDisplay<MockPin, NoopDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let pin = |gpio| MockPin {
            gpio,
            high: false,
            log: log.clone(),
        };
        let lines = DisplayLines {
            segments: SEGMENTS.map(|g| Line::cathode(pin(g), false)),
            decimal_point: Line::cathode(pin(DP), false),
            digits: DIGITS.map(|g| Line::anode(pin(g), false)),
            colon_anode: Line::anode(pin(COLON_ANODE), false),
            colon_cathode: Line::cathode(pin(COLON_CATHODE), false),
            degree_anode: Line::anode(pin(DEGREE_ANODE), false),
            degree_cathode: Line::cathode(pin(DEGREE_CATHODE), false),
        };
        let display = MultiplexDisplay::new(lines, NoopDelay { total_us: 0 }, 2500);
        log.borrow_mut().clear();
        (display, log)
    }

    fn level(display: &MultiplexDisplay<MockPin, NoopDelay>, gpio: u8) -> bool {
        let lines = display.lines();
        lines
            .segments
            .iter()
            .chain(core::iter::once(&lines.decimal_point))
            .chain(lines.digits.iter())
            .chain([
                &lines.colon_anode,
                &lines.colon_cathode,
                &lines.degree_anode,
                &lines.degree_cathode,
            ])
            .find(|l| l.pin().gpio == gpio)
            .map(|l| l.pin().is_set_high())
            .unwrap()
    }

    #[test]
    fn test_starts_dark() {
        let (display, _) = display();
        for g in SEGMENTS {
            assert!(level(&display, g), "segment gpio{} should idle high", g);
        }
        for g in DIGITS {
            assert!(!level(&display, g));
        }
        assert!(!level(&display, COLON_ANODE));
        assert!(level(&display, COLON_CATHODE));
    }

    #[test]
    fn test_write_does_not_touch_pins() {
        let (mut display, log) = display();
        display.write("8888", Some(true), Some(true));
        assert!(log.borrow().is_empty());
        assert_eq!(display.buffer().slot(0).character, '8');
    }

    #[test]
    fn test_last_digit_pattern() {
        let (mut display, _) = display();
        display.write("0001", None, None);
        display.refresh();

        // Digit 4 left enabled showing "1": segments B and C low
        assert!(level(&display, DIGITS[3]));
        assert!(!level(&display, DIGITS[0]));
        assert!(level(&display, SEGMENTS[0]));
        assert!(!level(&display, SEGMENTS[1]));
        assert!(!level(&display, SEGMENTS[2]));
        assert!(level(&display, SEGMENTS[6]));
        assert!(level(&display, DP));
    }

    #[test]
    fn test_decimal_point_driven_low() {
        let (mut display, _) = display();
        display.write("123.4", None, None);
        display.refresh();
        // Last slot "4" has no point
        assert!(level(&display, DP));

        display.write("1234.", None, None);
        display.refresh();
        assert!(!level(&display, DP));
    }

    #[test]
    fn test_indicators() {
        let (mut display, _) = display();
        display.write("1234", Some(true), Some(false));
        display.refresh();
        assert!(level(&display, COLON_ANODE));
        assert!(!level(&display, COLON_CATHODE));
        assert!(!level(&display, DEGREE_ANODE));
        assert!(level(&display, DEGREE_CATHODE));
    }

    #[test]
    fn test_pass_order() {
        let (mut display, log) = display();
        display.write("8", Some(true), None);
        display.refresh();

        let log = log.borrow();
        // Each slot begins by disabling all four digits
        assert_eq!(
            &log[..4],
            &[(18, false), (19, false), (21, false), (12, false)]
        );
        // ...then the segments, the point, and the digit's own anode
        let enable = log.iter().position(|e| *e == (18, true)).unwrap();
        assert_eq!(enable, 4 + 7 + 1);
        // Indicators follow the first digit only
        assert_eq!(log[enable + 1], (COLON_ANODE, true));
        assert_eq!(log.iter().filter(|e| e.0 == COLON_ANODE).count(), 1);
    }

    #[test]
    fn test_dwell_per_digit() {
        let (mut display, _) = display();
        display.refresh();
        assert_eq!(display.delay.total_us, 4 * 2500);
    }

    #[test]
    fn test_refresh_idempotent() {
        let (mut display, log) = display();
        display.write("12.3C", Some(false), Some(true));

        display.refresh();
        let first: Vec<_> = log.borrow_mut().drain(..).collect();
        display.refresh();
        let second: Vec<_> = log.borrow_mut().drain(..).collect();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_inverted_line() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut line = Line::anode(
            MockPin {
                gpio: 1,
                high: false,
                log,
            },
            true,
        );
        line.set(true);
        assert!(!line.pin().is_set_high());
        assert!(line.is_on());
    }
}
