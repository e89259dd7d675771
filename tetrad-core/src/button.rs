//! Button debouncing
//!
//! Non-blocking edge detector. A press edge arms the debouncer; the press
//! is reported once the input has stayed asserted for the settle time. A
//! release before then drops it. Sampling never sleeps, so the display
//! keeps refreshing while a press settles.

/// Debounced press detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    settle_ms: u32,
    last_level: bool,
    armed_at: Option<u64>,
}

impl Debouncer {
    /// Create a debouncer with the given settle time
    pub const fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            last_level: false,
            armed_at: None,
        }
    }

    /// Feed one sample; returns `true` exactly once per accepted press
    pub fn sample(&mut self, pressed: bool, now_ms: u64) -> bool {
        let rising = pressed && !self.last_level;
        self.last_level = pressed;

        if !pressed {
            self.armed_at = None;
            return false;
        }

        if rising {
            self.armed_at = Some(now_ms);
        }

        match self.armed_at {
            Some(at) if now_ms.saturating_sub(at) >= u64::from(self.settle_ms) => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }
}
