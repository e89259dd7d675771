//! Scrolling text
//!
//! Text that fits on the display is written once and left alone. Longer
//! text is padded with three blanks on each side and slid right to left
//! one character per interval.
//!
//! The scroller does not own the display. Every call that renders takes
//! the display as an argument, so the application can hand the same
//! buffer to both.

use heapless::{String, Vec};

use crate::display::DIGIT_COUNT;
use crate::traits::SegmentDisplay;

/// Longest text accepted for scrolling (longer input is truncated)
pub const MAX_SCROLL_TEXT: usize = 64;

/// Blank characters added on each side of a scrolled message
pub const SCROLL_PADDING: usize = 3;

const MAX_MESSAGE_LEN: usize = MAX_SCROLL_TEXT + 2 * SCROLL_PADDING;

/// Scroll session state
#[derive(Debug, Clone)]
pub struct Scroller {
    message: Vec<char, MAX_MESSAGE_LEN>,
    cursor: usize,
    looping: bool,
    active: bool,
    last_advance_ms: u64,
    interval_ms: u32,
}

impl Scroller {
    /// Create an idle scroller advancing every `interval_ms`
    pub fn new(interval_ms: u32) -> Self {
        Self {
            message: Vec::new(),
            cursor: 0,
            looping: false,
            active: false,
            last_advance_ms: 0,
            interval_ms,
        }
    }

    /// Show `text`, scrolling it if it does not fit
    ///
    /// Text of four characters or fewer is written straight to `display`
    /// and leaves the scroller inactive.
    pub fn start<D>(&mut self, display: &mut D, text: &str, looping: bool, now_ms: u64)
    where
        D: SegmentDisplay + ?Sized,
    {
        if text.chars().count() <= DIGIT_COUNT {
            display.write(text, None, None);
            self.active = false;
            return;
        }

        self.message.clear();
        for c in core::iter::repeat(' ')
            .take(SCROLL_PADDING)
            .chain(text.chars().take(MAX_SCROLL_TEXT))
            .chain(core::iter::repeat(' ').take(SCROLL_PADDING))
        {
            // Capacity covers the truncated text plus padding
            let _ = self.message.push(c);
        }

        self.cursor = 0;
        self.looping = looping;
        self.active = true;
        self.last_advance_ms = now_ms;
    }

    /// Stop scrolling, leaving the last frame on the display
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advance the scroll if the interval has passed
    ///
    /// Returns whether the scroller is still active.
    pub fn update<D>(&mut self, display: &mut D, now_ms: u64) -> bool
    where
        D: SegmentDisplay + ?Sized,
    {
        if !self.active {
            return false;
        }

        if now_ms.saturating_sub(self.last_advance_ms) > u64::from(self.interval_ms) {
            self.last_advance_ms = now_ms;

            let frame: String<{ DIGIT_COUNT * 4 }> = self
                .message
                .iter()
                .skip(self.cursor)
                .take(DIGIT_COUNT)
                .collect();
            display.write(&frame, Some(false), Some(false));

            self.cursor += 1;
            if self.cursor > self.last_cursor() {
                if self.looping {
                    self.cursor = 0;
                } else {
                    self.active = false;
                }
            }
        }

        self.active
    }

    /// Whether a scroll is in progress
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the current session repeats
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Offset of the next frame into the padded message
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Padded message of the current or last session
    pub fn message(&self) -> &[char] {
        &self.message
    }

    fn last_cursor(&self) -> usize {
        self.message.len().saturating_sub(DIGIT_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayBuffer;
    use proptest::prelude::*;

    const INTERVAL: u32 = 350;

    fn text_of(buf: &DisplayBuffer) -> [char; 4] {
        let s = buf.slots();
        [s[0].character, s[1].character, s[2].character, s[3].character]
    }

    /// Step far enough past the interval to force one advance
    fn step(scroller: &mut Scroller, buf: &mut DisplayBuffer, now: &mut u64) -> bool {
        *now += u64::from(INTERVAL) + 1;
        scroller.update(buf, *now)
    }

    #[test]
    fn test_short_text_is_static() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        scroller.start(&mut buf, "HI", false, 0);

        assert!(!scroller.is_active());
        assert_eq!(text_of(&buf), ['H', 'I', ' ', ' ']);
        assert!(!scroller.update(&mut buf, 10_000));
    }

    #[test]
    fn test_padding() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        scroller.start(&mut buf, "HELLO", false, 0);

        let expected: Vec<char, 16> = "   HELLO   ".chars().collect();
        assert_eq!(scroller.message(), &expected[..]);
        assert_eq!(scroller.message().len(), 11);
        assert!(scroller.is_active());
    }

    #[test]
    fn test_runs_out_after_eight_advances() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        let mut now = 0;
        scroller.start(&mut buf, "HELLO", false, now);

        for _ in 0..7 {
            assert!(step(&mut scroller, &mut buf, &mut now));
        }
        assert_eq!(text_of(&buf), ['L', 'O', ' ', ' ']);
        assert!(!step(&mut scroller, &mut buf, &mut now));
        assert_eq!(text_of(&buf), ['O', ' ', ' ', ' ']);
    }

    #[test]
    fn test_loop_wraps_cursor() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        let mut now = 0;
        scroller.start(&mut buf, "HELLO", true, now);

        for _ in 0..8 {
            assert!(step(&mut scroller, &mut buf, &mut now));
        }
        assert_eq!(scroller.cursor(), 0);
        assert!(scroller.is_active());

        step(&mut scroller, &mut buf, &mut now);
        assert_eq!(text_of(&buf), [' ', ' ', ' ', 'H']);
    }

    #[test]
    fn test_frames_advance_left() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        let mut now = 0;
        scroller.start(&mut buf, "HELLO", false, now);

        step(&mut scroller, &mut buf, &mut now);
        assert_eq!(text_of(&buf), [' ', ' ', ' ', 'H']);
        step(&mut scroller, &mut buf, &mut now);
        assert_eq!(text_of(&buf), [' ', ' ', 'H', 'E']);
    }

    #[test]
    fn test_waits_for_interval() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        scroller.start(&mut buf, "HELLO", false, 1_000);

        scroller.update(&mut buf, 1_000 + u64::from(INTERVAL));
        assert_eq!(scroller.cursor(), 0);
        scroller.update(&mut buf, 1_001 + u64::from(INTERVAL));
        assert_eq!(scroller.cursor(), 1);
    }

    #[test]
    fn test_scroll_forces_indicators_off() {
        let mut buf = DisplayBuffer::new();
        buf.write("1234", Some(true), Some(true));
        let mut scroller = Scroller::new(INTERVAL);
        let mut now = 0;
        scroller.start(&mut buf, "HELLO", false, now);
        step(&mut scroller, &mut buf, &mut now);

        assert!(!buf.colon());
        assert!(!buf.degree());
    }

    #[test]
    fn test_stop_keeps_frame() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        let mut now = 0;
        scroller.start(&mut buf, "HELLO", true, now);
        step(&mut scroller, &mut buf, &mut now);
        step(&mut scroller, &mut buf, &mut now);

        scroller.stop();
        assert!(!scroller.is_active());
        assert!(!step(&mut scroller, &mut buf, &mut now));
        assert_eq!(text_of(&buf), [' ', ' ', 'H', 'E']);
    }

    #[test]
    fn test_long_text_truncated() {
        let mut buf = DisplayBuffer::new();
        let mut scroller = Scroller::new(INTERVAL);
        let long: std::string::String = core::iter::repeat('8').take(200).collect();
        scroller.start(&mut buf, &long, false, 0);
        assert_eq!(scroller.message().len(), MAX_SCROLL_TEXT + 2 * SCROLL_PADDING);
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(text in "[A-Z0-9 .]{5,30}", looping in any::<bool>(), steps in 0usize..80) {
            let mut buf = DisplayBuffer::new();
            let mut scroller = Scroller::new(INTERVAL);
            let mut now = 0;
            scroller.start(&mut buf, &text, looping, now);
            for _ in 0..steps {
                step(&mut scroller, &mut buf, &mut now);
                if scroller.is_active() {
                    prop_assert!(scroller.cursor() <= scroller.message().len() - DIGIT_COUNT);
                }
            }
            if looping {
                prop_assert!(scroller.is_active());
            }
        }
    }
}
