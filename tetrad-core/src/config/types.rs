//! Behaviour configuration types
//!
//! Timers, messages and network settings, plus the [`DeviceConfig`] that
//! bundles them with the hardware wiring.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{ButtonConfig, DisplayPinsConfig};
use crate::state::RotationMode;

/// Maximum length of a configured message
pub const MAX_MESSAGE_LEN: usize = 32;

/// Maximum length of the DHCP hostname
pub const MAX_HOSTNAME_LEN: usize = 32;

/// Configured message text
pub type MessageText = String<MAX_MESSAGE_LEN>;

/// Scheduling intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Time between scroll advances
    pub scroll_interval_ms: u32,
    /// How long the rotation shows the time
    pub time_rotation_s: u32,
    /// How long the rotation shows the temperature
    pub temperature_rotation_s: u32,
    /// Content re-render period (also the colon blink period)
    pub content_refresh_ms: u32,
    /// Manual mode ends after this long without a press
    pub manual_timeout_s: u32,
    /// Remote override length when a request gives none
    pub remote_default_duration_s: u32,
    /// Wait before resetting after a fatal fault
    pub restart_delay_s: u32,
}

impl TimingConfig {
    /// Rotation period for a mode, in milliseconds
    pub fn rotation_ms(&self, mode: RotationMode) -> u64 {
        let seconds = match mode {
            RotationMode::Time => self.time_rotation_s,
            RotationMode::Temperature => self.temperature_rotation_s,
        };
        u64::from(seconds) * 1000
    }

    /// Manual inactivity timeout in milliseconds
    pub fn manual_timeout_ms(&self) -> u64 {
        u64::from(self.manual_timeout_s) * 1000
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scroll_interval_ms: 350,
            time_rotation_s: 10,
            temperature_rotation_s: 5,
            content_refresh_ms: 1000,
            manual_timeout_s: 15,
            remote_default_duration_s: 15,
            restart_delay_s: 10,
        }
    }
}

/// Fixed display messages
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessagesConfig {
    /// Scrolled at power-on
    pub startup: MessageText,
    /// Scrolled when the network could not be joined
    pub wifi_failed: MessageText,
    /// Shown while joining
    pub connecting: MessageText,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            startup: message("HELLO PICO"),
            wifi_failed: message("WIFI FAILED"),
            connecting: message("CONN"),
        }
    }
}

/// Network settings (credentials are not stored here)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkConfig {
    /// Hostname advertised over DHCP
    pub hostname: String<MAX_HOSTNAME_LEN>,
    /// Control server TCP port
    pub port: u16,
    /// Per-connection receive timeout
    pub read_timeout_ms: u32,
    /// Join plus DHCP budget
    pub connect_timeout_s: u32,
    /// SNTP server address
    pub ntp_server: [u8; 4],
    /// Local offset from UTC
    pub utc_offset_minutes: i16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut hostname = String::new();
        let _ = hostname.push_str("tetrad");
        Self {
            hostname,
            port: 80,
            read_timeout_ms: 500,
            connect_timeout_s: 10,
            ntp_server: [162, 159, 200, 1],
            utc_offset_minutes: 0,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub display: DisplayPinsConfig,
    pub button: ButtonConfig,
    pub timing: TimingConfig,
    pub messages: MessagesConfig,
    pub network: NetworkConfig,
}

impl DeviceConfig {
    /// Configuration with every default
    pub fn new() -> Self {
        Self::default()
    }
}

fn message(text: &str) -> MessageText {
    let mut out = MessageText::new();
    let _ = out.push_str(text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_periods() {
        let timing = TimingConfig::default();
        assert_eq!(timing.rotation_ms(RotationMode::Time), 10_000);
        assert_eq!(timing.rotation_ms(RotationMode::Temperature), 5_000);
        assert_eq!(timing.manual_timeout_ms(), 15_000);
    }

    #[test]
    fn test_default_messages() {
        let messages = MessagesConfig::default();
        assert_eq!(messages.startup.as_str(), "HELLO PICO");
        assert_eq!(messages.wifi_failed.as_str(), "WIFI FAILED");
        assert_eq!(messages.connecting.as_str(), "CONN");
    }

    #[test]
    fn test_default_network() {
        let network = NetworkConfig::default();
        assert_eq!(network.hostname.as_str(), "tetrad");
        assert_eq!(network.port, 80);
        assert_eq!(network.ntp_server, [162, 159, 200, 1]);
    }
}
