//! Wall clock
//!
//! Anchors a Unix timestamp from a time sync to the monotonic millisecond
//! counter and derives local hours and minutes from it. Until the first
//! sync, the clock counts from midnight at boot.

const SECONDS_PER_DAY: i64 = 86_400;

/// Local time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Monotonic-anchored wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    /// Unix seconds at `anchor_ms`
    unix_at_anchor: i64,
    /// Monotonic time of the last sync
    anchor_ms: u64,
    /// Offset applied to UTC for display
    utc_offset_minutes: i16,
}

impl WallClock {
    /// Create an unsynced clock with a display offset
    pub const fn new(utc_offset_minutes: i16) -> Self {
        Self {
            unix_at_anchor: 0,
            anchor_ms: 0,
            utc_offset_minutes,
        }
    }

    /// Record a successful time sync
    pub fn sync(&mut self, unix_seconds: u64, now_ms: u64) {
        self.unix_at_anchor = unix_seconds as i64;
        self.anchor_ms = now_ms;
    }

    /// Local time of day at `now_ms`
    pub fn time_of_day(&self, now_ms: u64) -> TimeOfDay {
        let local = self.unix_at_anchor
            + self.elapsed_s(now_ms)
            + i64::from(self.utc_offset_minutes) * 60;
        let secs = local.rem_euclid(SECONDS_PER_DAY);
        TimeOfDay {
            hour: (secs / 3600) as u8,
            minute: ((secs % 3600) / 60) as u8,
            second: (secs % 60) as u8,
        }
    }

    fn elapsed_s(&self, now_ms: u64) -> i64 {
        (now_ms.saturating_sub(self.anchor_ms) / 1000) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsynced_counts_from_boot() {
        let clock = WallClock::new(0);
        let t = clock.time_of_day(3_661_000);
        assert_eq!((t.hour, t.minute, t.second), (1, 1, 1));
    }

    #[test]
    fn test_sync_anchors_time() {
        let mut clock = WallClock::new(0);
        // 2024-01-01 12:34:56 UTC
        clock.sync(1_704_112_496, 10_000);
        let t = clock.time_of_day(10_000);
        assert_eq!((t.hour, t.minute, t.second), (12, 34, 56));

        let t = clock.time_of_day(70_000);
        assert_eq!((t.hour, t.minute), (12, 35));
    }

    #[test]
    fn test_offset_applied() {
        let mut clock = WallClock::new(210);
        clock.sync(1_704_112_496, 0);
        let t = clock.time_of_day(0);
        assert_eq!((t.hour, t.minute), (16, 4));
    }

    #[test]
    fn test_negative_offset_wraps_day() {
        let mut clock = WallClock::new(-300);
        // 2024-01-01 02:00:00 UTC
        clock.sync(1_704_074_400, 0);
        let t = clock.time_of_day(0);
        assert_eq!((t.hour, t.minute), (21, 0));
    }
}
