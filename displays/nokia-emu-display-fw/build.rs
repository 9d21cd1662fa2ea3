//! Build script for nokia-emu-display-fw
//!
//! - Adds the cortex-m-rt and defmt linker scripts
//! - Validates emulator.toml and turns it into constants for the firmware

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest label that fits on one row of a 128-pixel panel
const MAX_LABEL_LEN: usize = 21;

fn main() {
    setup_linker();
    generate_config();
}

fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn generate_config() {
    println!("cargo:rerun-if-changed=emulator.toml");

    let path = Path::new("emulator.toml");
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => fail(&[format!("cannot read emulator.toml: {}", e)]),
    };
    let config: toml::Value = match toml::from_str(&text) {
        Ok(value) => value,
        Err(e) => fail(&[format!("invalid TOML in emulator.toml: {}", e)]),
    };

    let mut errors = Vec::new();

    let width = integer(&config, "panel", "width", 84, 1024, &mut errors);
    let height = integer(&config, "panel", "height", 48, 1024, &mut errors);
    let column_offset = integer(&config, "panel", "column_offset", 0, 255, &mut errors);
    let row_offset = integer(&config, "panel", "row_offset", 0, 255, &mut errors);
    if width % 2 != 0 {
        errors.push("[panel] width must be even".to_string());
    }

    let frequency = integer(&config, "spi", "frequency_hz", 100_000, 15_000_000, &mut errors);
    let mode = integer(&config, "spi", "mode", 0, 3, &mut errors);

    let test_pattern = match config.get("boot").and_then(|b| b.get("test_pattern")) {
        Some(toml::Value::Boolean(value)) => *value,
        Some(_) => {
            errors.push("[boot] test_pattern must be true or false".to_string());
            false
        }
        None => true,
    };
    let title = label(&config, "title", " Nokia 5110 ", &mut errors);
    let subtitle = label(&config, "subtitle", " Emulator ", &mut errors);

    if !errors.is_empty() {
        fail(&errors);
    }

    let mut out = String::new();
    let _ = writeln!(out, "// Generated from emulator.toml by build.rs");
    let _ = writeln!(out, "pub const PANEL_WIDTH: u16 = {};", width);
    let _ = writeln!(out, "pub const PANEL_HEIGHT: u16 = {};", height);
    let _ = writeln!(out, "pub const COLUMN_OFFSET: u16 = {};", column_offset);
    let _ = writeln!(out, "pub const ROW_OFFSET: u16 = {};", row_offset);
    let _ = writeln!(out, "pub const SPI_FREQUENCY_HZ: u32 = {};", frequency);
    let _ = writeln!(out, "pub const SPI_MODE: u8 = {};", mode);
    let _ = writeln!(out, "pub const TEST_PATTERN: bool = {};", test_pattern);
    let _ = writeln!(out, "pub const TITLE: &str = {:?};", title);
    let _ = writeln!(out, "pub const SUBTITLE: &str = {:?};", subtitle);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("emulator_config.rs"), out).unwrap();
}

/// Read `[section] key` as an integer within `min..=max`
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(value)) if (min..=max).contains(value) => *value,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            min
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            min
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            min
        }
    }
}

/// Read a `[boot]` label, which must be printable ASCII and fit on one row
fn label(config: &toml::Value, key: &str, default: &str, errors: &mut Vec<String>) -> String {
    let value = match config.get("boot").and_then(|b| b.get(key)) {
        Some(toml::Value::String(value)) => value.clone(),
        Some(_) => {
            errors.push(format!("[boot] {} must be a string", key));
            return String::new();
        }
        None => return default.to_string(),
    };

    if value.len() > MAX_LABEL_LEN {
        errors.push(format!(
            "[boot] {} is longer than {} characters",
            key, MAX_LABEL_LEN
        ));
    }
    if !value.bytes().all(|b| (0x20..0x7F).contains(&b)) {
        errors.push(format!("[boot] {} must be printable ASCII", key));
    }
    value
}

fn fail(errors: &[String]) -> ! {
    let mut message = String::from("\nemulator.toml is invalid:\n");
    for error in errors {
        let _ = writeln!(message, "  - {}", error);
    }
    panic!("{}", message);
}
