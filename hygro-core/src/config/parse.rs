//! Minimal TOML parser for the station configuration
//!
//! Handles only the subset needed for `station.toml`. It does NOT support
//! full TOML.
//!
//! Supported features:
//! - Key = value pairs (integer, hex integer, quoted string)
//! - [section] headers: `bus`, `display`, `sensor`, `pins`
//! - Comments (# ...), including trailing comments
//!
//! Keys missing from the file keep their defaults. Unknown keys and
//! sections are rejected so that typos do not silently fall back.

use super::types::{ConfigError, StationConfig, MAX_GPIO};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Display,
    Sensor,
    Pins,
}

/// Parse TOML configuration into a validated StationConfig
pub fn parse_config(input: &str) -> Result<StationConfig, ConfigError> {
    let mut config = StationConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ConfigError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "bus" => Ok(Section::Bus),
        "display" => Ok(Section::Display),
        "sensor" => Ok(Section::Sensor),
        "pins" => Ok(Section::Pins),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(s: &str) -> &str {
    match s.find('#') {
        Some(hash_pos) if s[..hash_pos].matches('"').count() % 2 == 0 => s[..hash_pos].trim(),
        _ => s,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an unsigned integer, decimal or `0x` hex, with `_` separators
fn parse_int(value: &str) -> Result<u32, ConfigError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }

    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidValue)
}

fn parse_u8(value: &str) -> Result<u8, ConfigError> {
    u8::try_from(parse_int(value)?).map_err(|_| ConfigError::OutOfRange)
}

/// Parse a pin given as "gpio11" or a bare number
fn parse_pin(value: &str) -> Result<u8, ConfigError> {
    let value = parse_string(value);
    if value.starts_with("gpio") {
        return parse_pin_string(value).ok_or(ConfigError::InvalidValue);
    }
    let pin = parse_u8(value)?;
    if pin > MAX_GPIO {
        return Err(ConfigError::OutOfRange);
    }
    Ok(pin)
}

/// Parse a pin string from config
///
/// Supports "gpio11" -> 11. Pin numbers beyond the RP2040 range are
/// rejected.
pub fn parse_pin_string(s: &str) -> Option<u8> {
    let num_str = s.trim().strip_prefix("gpio")?;
    let pin: u8 = num_str.parse().ok()?;

    if pin > MAX_GPIO {
        return None;
    }

    Some(pin)
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut StationConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Root => match key {
            "poll_interval_ms" => config.poll_interval_ms = parse_int(value)?,
            _ => return Err(ConfigError::UnknownKey),
        },
        Section::Bus => match key {
            "ack_timeout_us" => config.bus.ack_timeout_us = parse_int(value)?,
            _ => return Err(ConfigError::UnknownKey),
        },
        Section::Display => {
            let d = &mut config.display;
            match key {
                "address" => d.address = parse_u8(value)?,
                "columns" => d.columns = parse_u8(value)?,
                "rows" => d.rows = parse_u8(value)?,
                "enable_pulse_ms" => d.enable_pulse_ms = parse_int(value)?,
                "latch_settle_ms" => d.latch_settle_ms = parse_int(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
        Section::Sensor => {
            let s = &mut config.sensor;
            match key {
                "start_pulse_ms" => s.start_pulse_ms = parse_int(value)?,
                "sample_offset_us" => s.sample_offset_us = parse_int(value)?,
                "handshake_timeout_us" => s.handshake_timeout_us = parse_int(value)?,
                "bit_timeout_us" => s.bit_timeout_us = parse_int(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
        Section::Pins => {
            let p = &mut config.pins;
            match key {
                "scl" => p.scl = parse_pin(value)?,
                "sda" => p.sda = parse_pin(value)?,
                "sensor" => p.sensor = parse_pin(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
    }

    Ok(())
}
