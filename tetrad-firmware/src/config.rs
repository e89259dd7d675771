//! Configuration loading
//!
//! The device configuration is embedded at build time and parsed once
//! at boot. A configuration that fails to parse falls back to the
//! built-in defaults so the clock still comes up.

use defmt::*;

use tetrad_core::config::{parse_config, DeviceConfig};

/// Embedded configuration (edit device.toml and rebuild to customize)
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// Parse the embedded configuration, or fall back to defaults
pub fn load() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            log_config_summary(&config);
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            DeviceConfig::default()
        }
    }
}

fn log_config_summary(config: &DeviceConfig) {
    debug!("  dwell {} us", config.display.dwell_us);
    debug!(
        "  button gpio{} (inverted={}, pull_up={})",
        config.button.pin.pin, config.button.pin.inverted, config.button.pin.pull_up
    );
    debug!(
        "  rotation {}s time / {}s temperature",
        config.timing.time_rotation_s, config.timing.temperature_rotation_s
    );
    debug!(
        "  server port {}, read timeout {} ms",
        config.network.port, config.network.read_timeout_ms
    );
}
