//! Build script for hygro-firmware
//!
//! - Sets up linker search paths and arguments for memory.x
//! - Validates station.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section ("" is the root table)
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("", &["poll_interval_ms"]),
    ("bus", &["ack_timeout_us"]),
    (
        "display",
        &["address", "columns", "rows", "enable_pulse_ms", "latch_settle_ms"],
    ),
    (
        "sensor",
        &[
            "start_pulse_ms",
            "sample_offset_us",
            "handshake_timeout_us",
            "bit_timeout_us",
        ],
    ),
    ("pins", &["scl", "sda", "sensor"]),
];

/// Rows the firmware writes (humidity, temperature)
const DISPLAY_ROWS: i64 = 2;

/// Width of the widest row, "Temp = 255.255°C"
const MIN_COLUMNS: i64 = 16;

const MAX_COLUMNS: i64 = 40;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate station.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=station.toml");

    let config_path = Path::new("station.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read station.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in station.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_keys(&config, &mut errors);
    validate_values(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in station.toml                    ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=station.toml validated successfully");
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

fn known_keys(section: &str) -> Option<&'static [&'static str]> {
    KNOWN_KEYS
        .iter()
        .find(|(name, _)| *name == section)
        .map(|(_, keys)| *keys)
}

/// Reject unknown sections and keys
fn validate_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (key, value) in root {
        match value.as_table() {
            Some(table) => match known_keys(key) {
                Some(keys) => {
                    for inner in table.keys() {
                        if !keys.contains(&inner.as_str()) {
                            errors.push(format!("[{}] unknown key '{}'", key, inner));
                        }
                    }
                }
                None => errors.push(format!("Unknown section [{}]", key)),
            },
            None => {
                if !known_keys("").is_some_and(|keys| keys.contains(&key.as_str())) {
                    errors.push(format!("Unknown key '{}'", key));
                }
            }
        }
    }
}

fn get_int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    let table = if section.is_empty() {
        Some(config)
    } else {
        config.get(section)
    };
    table?.get(key)?.as_integer()
}

fn get_pin(config: &toml::Value, key: &str, errors: &mut Vec<String>) -> Option<u8> {
    let value = config.get("pins")?.get(key)?;
    let pin = match value {
        toml::Value::String(s) => s.strip_prefix("gpio").and_then(|n| n.parse::<u8>().ok()),
        toml::Value::Integer(n) => u8::try_from(*n).ok(),
        _ => None,
    };
    match pin {
        Some(p) if p <= 29 => Some(p),
        _ => {
            errors.push(format!("[pins] {} must be gpio0-gpio29", key));
            None
        }
    }
}

/// Range-check every value, mirroring `StationConfig::validate`
///
/// Missing keys take the firmware defaults so cross-field rules still hold.
fn validate_values(config: &toml::Value, errors: &mut Vec<String>) {
    let int_or = |section: &str, key: &str, default: i64| {
        get_int(config, section, key).unwrap_or(default)
    };

    let interval = int_or("", "poll_interval_ms", 500);
    if !(1..=i64::from(u32::MAX)).contains(&interval) {
        errors.push(format!("poll_interval_ms must be positive, got {}", interval));
    }

    let ack = int_or("bus", "ack_timeout_us", 1_000);
    if !(1..=i64::from(u32::MAX)).contains(&ack) {
        errors.push(format!("[bus] ack_timeout_us must be positive, got {}", ack));
    }

    let address = int_or("display", "address", 0x27);
    if !(0..=0x7F).contains(&address) {
        errors.push(format!(
            "[display] address 0x{:X} is not a 7-bit address",
            address
        ));
    }

    let columns = int_or("display", "columns", 16);
    if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
        errors.push(format!(
            "[display] columns must be {}-{}, got {}",
            MIN_COLUMNS, MAX_COLUMNS, columns
        ));
    }

    let rows = int_or("display", "rows", DISPLAY_ROWS);
    if rows != DISPLAY_ROWS {
        errors.push(format!(
            "[display] rows must be {}, got {}",
            DISPLAY_ROWS, rows
        ));
    }

    for key in ["enable_pulse_ms", "latch_settle_ms"] {
        if let Some(value) = get_int(config, "display", key) {
            if !(0..=i64::from(u32::MAX)).contains(&value) {
                errors.push(format!("[display] {} out of range, got {}", key, value));
            }
        }
    }

    let pulse = int_or("sensor", "start_pulse_ms", 20);
    if !(18..=i64::from(u32::MAX)).contains(&pulse) {
        errors.push(format!(
            "[sensor] start_pulse_ms must be at least 18, got {}",
            pulse
        ));
    }

    let offset = int_or("sensor", "sample_offset_us", 30);
    if !(29..=69).contains(&offset) {
        errors.push(format!(
            "[sensor] sample_offset_us must be 29-69, got {}",
            offset
        ));
    }

    let handshake = int_or("sensor", "handshake_timeout_us", 1_000);
    if !(1..=i64::from(u32::MAX)).contains(&handshake) {
        errors.push(format!(
            "[sensor] handshake_timeout_us must be positive, got {}",
            handshake
        ));
    }

    let bit = int_or("sensor", "bit_timeout_us", 200);
    if bit <= offset || bit > i64::from(u32::MAX) {
        errors.push(format!(
            "[sensor] bit_timeout_us ({}) must exceed sample_offset_us ({})",
            bit, offset
        ));
    }

    let pins: Vec<(&str, u8)> = ["scl", "sda", "sensor"]
        .into_iter()
        .filter_map(|key| get_pin(config, key, errors).map(|pin| (key, pin)))
        .collect();
    for (i, (name, pin)) in pins.iter().enumerate() {
        for (other, other_pin) in &pins[i + 1..] {
            if pin == other_pin {
                errors.push(format!("[pins] {} and {} both use gpio{}", name, other, pin));
            }
        }
    }
}
