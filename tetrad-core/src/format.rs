//! Display text formatting
//!
//! Produces the short strings the application writes to the display.
//! Periods in the output merge into the preceding digit's decimal point,
//! so "23.5C" occupies four slots.

use core::fmt::Write;

use heapless::String;

/// Text destined for the 4-digit display
pub type DisplayText = String<16>;

/// Dotted-quad address text (or the no-address placeholder)
pub type AddressText = String<16>;

/// Placeholder shown and reported when no address has been acquired
pub const NO_ADDRESS: &str = "NO IP";

/// Shown when the temperature cannot be read
pub const SENSOR_FAULT: &str = "----";

/// Visible characters kept before the trailing `C`
const TEMPERATURE_DIGITS: usize = 3;

/// Format a time of day as `HHMM`
pub fn format_time(hour: u8, minute: u8) -> DisplayText {
    let mut out = DisplayText::new();
    let _ = write!(out, "{:02}{:02}", hour % 24, minute % 60);
    out
}

/// Format a temperature as up to three visible characters and a `C`
///
/// Field rules: at or above 100 there is no decimal, at or above 10 and
/// below zero one decimal, between 0 and 10 one decimal behind a leading
/// blank. A period left dangling by truncation is dropped.
pub fn format_temperature(celsius: f32) -> DisplayText {
    if !celsius.is_finite() {
        return text(SENSOR_FAULT);
    }

    let mut raw: String<24> = String::new();
    let _ = if celsius >= 100.0 {
        write!(raw, "{:.0}", celsius)
    } else if celsius >= 10.0 {
        write!(raw, "{:.1}", celsius)
    } else if celsius >= 0.0 {
        write!(raw, " {:.1}", celsius)
    } else {
        write!(raw, "{:.1}", celsius)
    };

    let mut out = DisplayText::new();
    let mut visible = 0;
    let mut chars = raw.chars().peekable();
    while visible < TEMPERATURE_DIGITS {
        let Some(c) = chars.next() else { break };
        let _ = out.push(c);
        visible += 1;
        if chars.next_if_eq(&'.').is_some() && visible < TEMPERATURE_DIGITS {
            let _ = out.push('.');
        }
    }
    let _ = out.push('C');
    out
}

/// Format an IPv4 address as dotted text, or [`NO_ADDRESS`]
pub fn format_address(address: Option<[u8; 4]>) -> AddressText {
    let mut out = AddressText::new();
    match address {
        Some([a, b, c, d]) => {
            let _ = write!(out, "{}.{}.{}.{}", a, b, c, d);
        }
        None => {
            let _ = out.push_str(NO_ADDRESS);
        }
    }
    out
}

fn text(s: &str) -> DisplayText {
    let mut out = DisplayText::new();
    let _ = out.push_str(s);
    out
}
