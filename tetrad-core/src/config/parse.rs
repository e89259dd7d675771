//! Device configuration parser
//!
//! Minimal TOML-subset parser for `device.toml`. It does NOT support the
//! full TOML grammar; the build script checks the file with a real TOML
//! parser before it is embedded.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` with strings, integers and booleans
//! - Comments (`# ...`), including trailing ones
//! - Pin strings: `gpioN`, `!gpioN` (active-low), `^gpioN` (pull-up)
//!
//! Keys that are absent keep their defaults.

use core::str::FromStr;

use heapless::String;

use super::hardware::{PinConfig, MAX_GPIO};
use super::types::DeviceConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Key not valid in its section
    UnknownKey,
    /// Invalid pin string
    InvalidPin,
    /// String longer than its field allows
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Button,
    Timing,
    Messages,
    Network,
}

/// Parse `device.toml` into a [`DeviceConfig`]
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = strip_comment(header)
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "button" => Ok(Section::Button),
        "timing" => Ok(Section::Timing),
        "messages" => Ok(Section::Messages),
        "network" => Ok(Section::Network),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Display => {
            let d = &mut config.display;
            match key {
                "segments_a" => d.segments[0] = parse_pin(value)?,
                "segments_b" => d.segments[1] = parse_pin(value)?,
                "segments_c" => d.segments[2] = parse_pin(value)?,
                "segments_d" => d.segments[3] = parse_pin(value)?,
                "segments_e" => d.segments[4] = parse_pin(value)?,
                "segments_f" => d.segments[5] = parse_pin(value)?,
                "segments_g" => d.segments[6] = parse_pin(value)?,
                "segment_dp" => d.decimal_point = parse_pin(value)?,
                "digit_1" => d.digits[0] = parse_pin(value)?,
                "digit_2" => d.digits[1] = parse_pin(value)?,
                "digit_3" => d.digits[2] = parse_pin(value)?,
                "digit_4" => d.digits[3] = parse_pin(value)?,
                "colon_anode" => d.colon_anode = parse_pin(value)?,
                "colon_cathode" => d.colon_cathode = parse_pin(value)?,
                "degree_anode" => d.degree_anode = parse_pin(value)?,
                "degree_cathode" => d.degree_cathode = parse_pin(value)?,
                "dwell_us" => d.dwell_us = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Button => match key {
            "pin" => config.button.pin = parse_pin(value)?,
            "debounce_ms" => config.button.debounce_ms = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "scroll_interval_ms" => t.scroll_interval_ms = parse_int(value)?,
                "time_rotation_s" => t.time_rotation_s = parse_int(value)?,
                "temperature_rotation_s" => t.temperature_rotation_s = parse_int(value)?,
                "content_refresh_ms" => t.content_refresh_ms = parse_int(value)?,
                "manual_timeout_s" => t.manual_timeout_s = parse_int(value)?,
                "remote_default_duration_s" => t.remote_default_duration_s = parse_int(value)?,
                "restart_delay_s" => t.restart_delay_s = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Messages => {
            let m = &mut config.messages;
            match key {
                "startup" => m.startup = parse_text(value)?,
                "wifi_failed" => m.wifi_failed = parse_text(value)?,
                "connecting" => m.connecting = parse_text(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Network => {
            let n = &mut config.network;
            match key {
                "hostname" => n.hostname = parse_text(value)?,
                "port" => n.port = parse_int(value)?,
                "read_timeout_ms" => n.read_timeout_ms = parse_int(value)?,
                "connect_timeout_s" => n.connect_timeout_s = parse_int(value)?,
                "ntp_server" => n.ntp_server = parse_ipv4(value)?,
                "utc_offset_minutes" => n.utc_offset_minutes = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        // No keys are valid outside a section
        Section::Root => return Err(ParseError::UnknownKey),
    }

    Ok(())
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Drop a `#` comment unless the `#` sits inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    }
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        // Allow unquoted strings for simple values
        .unwrap_or(value)
}

/// Parse a string value into a bounded field
fn parse_text<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    String::try_from(parse_string(value)).map_err(|_| ParseError::TooLong)
}

/// Parse an integer value
fn parse_int<T: FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a dotted IPv4 address like "162.159.200.1"
fn parse_ipv4(value: &str) -> Result<[u8; 4], ParseError> {
    let mut octets = [0u8; 4];
    let mut parts = parse_string(value).split('.');
    for octet in octets.iter_mut() {
        *octet = parse_int(parts.next().ok_or(ParseError::InvalidValue)?)?;
    }
    if parts.next().is_some() {
        return Err(ParseError::InvalidValue);
    }
    Ok(octets)
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value);
    let mut inverted = false;
    let mut pull_up = false;

    // Check for modifiers
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let pin: u8 = s
        .strip_prefix("gpio")
        .and_then(|n| n.parse().ok())
        .ok_or(ParseError::InvalidPin)?;
    if pin > MAX_GPIO {
        return Err(ParseError::InvalidPin);
    }

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio11").unwrap();
        assert_eq!(pin, PinConfig::new(11));

        let pin = parse_pin("!gpio12").unwrap();
        assert_eq!(pin.pin, 12);
        assert!(pin.inverted);

        let pin = parse_pin("^gpio4").unwrap();
        assert_eq!(pin.pin, 4);
        assert!(pin.pull_up);

        let pin = parse_pin("\"^!gpio22\"").unwrap();
        assert_eq!(pin, PinConfig::pulled_up_low(22));
    }

    #[test]
    fn test_parse_pin_invalid() {
        assert_eq!(parse_pin("gpio30"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("pin5"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpio"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("\"10.0.0.1\""), Ok([10, 0, 0, 1]));
        assert_eq!(parse_ipv4("10.0.0"), Err(ParseError::InvalidValue));
        assert_eq!(parse_ipv4("10.0.0.1.2"), Err(ParseError::InvalidValue));
        assert_eq!(parse_ipv4("10.0.0.256"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_inline_comment() {
        assert_eq!(
            parse_key_value("port = 8080 # dev"),
            Some(("port", "8080"))
        );
        assert_eq!(
            parse_key_value("startup = \"NO # HERE\""),
            Some(("startup", "\"NO # HERE\""))
        );
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), DeviceConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Tetrad wiring
[display]
segments_a = "gpio14"
digit_4 = "gpio15"
dwell_us = 2000

[button]
pin = "^!gpio16"   # to ground
debounce_ms = 30

[timing]
manual_timeout_s = 20

[messages]
startup = "HI THERE"

[network]
hostname = "clock"
port = 8080
ntp_server = "192.168.1.1"
utc_offset_minutes = -300
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.display.segments[0].pin, 14);
        assert_eq!(config.display.segments[1].pin, 3);
        assert_eq!(config.display.digits[3].pin, 15);
        assert_eq!(config.display.dwell_us, 2000);
        assert_eq!(config.button.pin, PinConfig::pulled_up_low(16));
        assert_eq!(config.button.debounce_ms, 30);
        assert_eq!(config.timing.manual_timeout_s, 20);
        assert_eq!(config.timing.time_rotation_s, 10);
        assert_eq!(config.messages.startup.as_str(), "HI THERE");
        assert_eq!(config.messages.connecting.as_str(), "CONN");
        assert_eq!(config.network.hostname.as_str(), "clock");
        assert_eq!(config.network.port, 8080);
        assert_eq!(config.network.ntp_server, [192, 168, 1, 1]);
        assert_eq!(config.network.utc_offset_minutes, -300);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[sound]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[timing"), Err(ParseError::InvalidSection));
        assert_eq!(
            parse_config("[timing]\nbogus = 1"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(parse_config("port = 80"), Err(ParseError::UnknownKey));
        assert_eq!(
            parse_config("[network]\nport = 70000"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[messages]\nstartup = \"THIS MESSAGE IS FAR TOO LONG TO STORE\""),
            Err(ParseError::TooLong)
        );
        assert_eq!(parse_config("[network]\nport"), Err(ParseError::InvalidValue));
    }
}
