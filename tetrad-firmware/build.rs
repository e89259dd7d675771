//! Build script for tetrad-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time
//! - Checks that the CYW43 firmware blobs are present

use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs wired to the wireless chip on the Pico W
const RESERVED_GPIOS: [i64; 4] = [23, 24, 25, 29];

/// Blobs `include_bytes!`-ed by the firmware
const CYW43_BLOBS: [&str; 2] = ["cyw43-firmware/43439A0.bin", "cyw43-firmware/43439A0_clm.bin"];

/// Keys in `[display]` that name a pin
const DISPLAY_PIN_KEYS: [&str; 16] = [
    "segments_a",
    "segments_b",
    "segments_c",
    "segments_d",
    "segments_e",
    "segments_f",
    "segments_g",
    "segment_dp",
    "digit_1",
    "digit_2",
    "digit_3",
    "digit_4",
    "colon_anode",
    "colon_cathode",
    "degree_anode",
    "degree_cathode",
];

fn main() {
    setup_linker();
    validate_config();
    check_blobs();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Credentials are baked in through option_env!
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml at build time.                  ║\n\
            ║  Please create one in the tetrad-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);
    validate_pins(&config);
    validate_numbers(&config);

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with a boxed list of errors, if there are any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    for section in ["display", "button"] {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("Missing [{}] section", section)),
        }
    }

    report("Missing required sections in device.toml", &errors);
}

/// Parse `gpioN` with optional `!` / `^` prefixes into a pin number
fn parse_pin(value: &str) -> Option<i64> {
    let number = value.trim_start_matches(['!', '^']).strip_prefix("gpio")?;
    number.parse().ok()
}

/// Validate pin ranges, reservations and duplicates
fn validate_pins(config: &toml::Value) {
    let mut errors = Vec::new();
    let mut used: BTreeMap<i64, String> = BTreeMap::new();

    let display_pins = DISPLAY_PIN_KEYS.iter().map(|key| ("display", *key));
    let button_pins = std::iter::once(("button", "pin"));

    for (section, key) in display_pins.chain(button_pins) {
        let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
            continue;
        };
        let name = format!("{}.{}", section, key);

        let Some(text) = value.as_str() else {
            errors.push(format!("{} must be a pin string like \"gpio4\"", name));
            continue;
        };
        let Some(pin) = parse_pin(text) else {
            errors.push(format!("{} = '{}' is not a pin", name, text));
            continue;
        };

        if !(0..=29).contains(&pin) {
            errors.push(format!("{} must be gpio0-gpio29", name));
        } else if RESERVED_GPIOS.contains(&pin) {
            errors.push(format!("{} uses gpio{} (wireless chip)", name, pin));
        } else if let Some(other) = used.insert(pin, name.clone()) {
            errors.push(format!("gpio{} used by both {} and {}", pin, other, name));
        }
    }

    report("Invalid pin configuration", &errors);
}

/// Validate numeric ranges
fn validate_numbers(config: &toml::Value) {
    let ranges: [(&str, &str, i64, i64); 13] = [
        ("display", "dwell_us", 100, 20_000),
        ("button", "debounce_ms", 0, 1_000),
        ("timing", "scroll_interval_ms", 10, 10_000),
        ("timing", "time_rotation_s", 1, 3_600),
        ("timing", "temperature_rotation_s", 1, 3_600),
        ("timing", "content_refresh_ms", 10, 60_000),
        ("timing", "manual_timeout_s", 1, 3_600),
        ("timing", "remote_default_duration_s", 0, 86_400),
        ("timing", "restart_delay_s", 0, 3_600),
        ("network", "port", 1, 65_535),
        ("network", "read_timeout_ms", 10, 60_000),
        ("network", "connect_timeout_s", 1, 600),
        ("network", "utc_offset_minutes", -720, 840),
    ];

    let mut errors = Vec::new();

    for (section, key, min, max) in ranges {
        let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
            continue;
        };
        match value.as_integer() {
            Some(n) if (min..=max).contains(&n) => {}
            Some(_) => errors.push(format!("[{}] {} must be {}-{}", section, key, min, max)),
            None => errors.push(format!("[{}] {} must be an integer", section, key)),
        }
    }

    if let Some(server) = config.get("network").and_then(|n| n.get("ntp_server")) {
        let valid = server
            .as_str()
            .map(|s| s.split('.').filter_map(|o| o.parse::<u8>().ok()).count() == 4)
            .unwrap_or(false);
        if !valid {
            errors.push("[network] ntp_server must be a dotted IPv4 address".to_string());
        }
    }

    report("Invalid values in device.toml", &errors);
}

/// Check the CYW43 firmware blobs exist
fn check_blobs() {
    let missing: Vec<String> = CYW43_BLOBS
        .iter()
        .inspect(|blob| println!("cargo:rerun-if-changed={}", blob))
        .filter(|blob| !Path::new(blob).exists())
        .map(|blob| format!("{} not found", blob))
        .collect();

    if !missing.is_empty() {
        let mut lines = missing;
        lines.push("Copy them from embassy's cyw43-firmware directory".to_string());
        report("CYW43 firmware blobs missing", &lines);
    }
}
