//! Build script for eosbox-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time
//! - Generates panel_config.rs from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest box name the splash screen and ping token can carry
const MAX_BOX_NAME_LEN: usize = 16;

/// Largest accepted ticks-per-step multiplier
const MAX_SCALE: i64 = 100;

/// Values written to panel_config.rs
struct PanelSettings {
    box_name: String,
    every_query: bool,
    ping_after_idle_ms: i64,
    timeout_after_idle_ms: i64,
    pan: WheelSettings,
    tilt: WheelSettings,
}

struct WheelSettings {
    scale: i64,
    reverse: bool,
}

fn main() {
    setup_linker();
    let settings = validate_config();
    generate_config(&settings);
}

/// Set up linker search paths and scripts
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml and extract the settings it holds
fn validate_config() -> PanelSettings {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panel.toml configuration file.          ║\n\
            ║  Please create one in the eosbox-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
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
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
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

    let (box_name, every_query) = validate_panel(&config, &mut errors);
    let (ping_after_idle_ms, timeout_after_idle_ms) = validate_liveness(&config, &mut errors);
    let pan = validate_wheel(&config, "pan", &mut errors);
    let tilt = validate_wheel(&config, "tilt", &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid panel configuration                              ║\n\
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

    println!("cargo:warning=panel.toml validated successfully");

    PanelSettings {
        box_name,
        every_query,
        ping_after_idle_ms,
        timeout_after_idle_ms,
        pan,
        tilt,
    }
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

/// Validate the [panel] section
fn validate_panel(config: &toml::Value, errors: &mut Vec<String>) -> (String, bool) {
    let mut box_name = String::from("box1");
    let mut every_query = false;

    let panel = match config.get("panel") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[panel] must be a table".into());
            return (box_name, every_query);
        }
        None => return (box_name, every_query),
    };

    match panel.get("box_name") {
        Some(toml::Value::String(name)) => {
            if name.is_empty() {
                errors.push("[panel] box_name cannot be empty".into());
            } else if name.len() > MAX_BOX_NAME_LEN {
                errors.push(format!(
                    "[panel] box_name must be at most {} characters",
                    MAX_BOX_NAME_LEN
                ));
            } else if !name.chars().all(|c| c.is_ascii_graphic()) {
                errors.push("[panel] box_name must be printable ASCII, no spaces".into());
            }
            box_name = name.clone();
        }
        Some(_) => errors.push("[panel] box_name must be a string".into()),
        None => {}
    }

    match panel.get("handshake_policy") {
        Some(toml::Value::String(policy)) => match policy.as_str() {
            "transition" => every_query = false,
            "every_query" => every_query = true,
            _ => errors.push(
                "[panel] handshake_policy must be 'transition' or 'every_query'".into(),
            ),
        },
        Some(_) => errors.push("[panel] handshake_policy must be a string".into()),
        None => {}
    }

    (box_name, every_query)
}

/// Validate the [liveness] section
fn validate_liveness(config: &toml::Value, errors: &mut Vec<String>) -> (i64, i64) {
    let liveness = config.get("liveness");
    let ping = read_integer(liveness, "liveness", "ping_after_idle_ms", 2500, errors);
    let timeout = read_integer(liveness, "liveness", "timeout_after_idle_ms", 5000, errors);

    if ping <= 0 {
        errors.push("[liveness] ping_after_idle_ms must be positive".into());
    }
    if timeout <= ping {
        errors.push("[liveness] timeout_after_idle_ms must exceed ping_after_idle_ms".into());
    }

    (ping, timeout)
}

/// Validate one [wheel.<name>] section
fn validate_wheel(config: &toml::Value, name: &str, errors: &mut Vec<String>) -> WheelSettings {
    let section = format!("wheel.{}", name);
    let wheel = config.get("wheel").and_then(|w| w.get(name));

    let scale = read_integer(wheel, &section, "scale", 1, errors);
    if !(1..=MAX_SCALE).contains(&scale) {
        errors.push(format!("[{}] scale must be 1-{}", section, MAX_SCALE));
    }

    let reverse = match wheel.and_then(|w| w.get("direction")) {
        Some(toml::Value::String(dir)) => match dir.as_str() {
            "forward" => false,
            "reverse" => true,
            _ => {
                errors.push(format!(
                    "[{}] direction must be 'forward' or 'reverse'",
                    section
                ));
                false
            }
        },
        Some(_) => {
            errors.push(format!("[{}] direction must be a string", section));
            false
        }
        None => false,
    };

    WheelSettings { scale, reverse }
}

fn read_integer(
    table: Option<&toml::Value>,
    section: &str,
    key: &str,
    default: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match table.and_then(|t| t.get(key)) {
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
        None => default,
    }
}

/// Write the validated settings as Rust constants
fn generate_config(settings: &PanelSettings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("panel_config.rs")).unwrap();

    writeln!(f, "// Generated from panel.toml by build.rs").unwrap();
    writeln!(f, "pub const BOX_NAME: &str = {:?};", settings.box_name).unwrap();
    writeln!(f, "pub const HANDSHAKE_EVERY_QUERY: bool = {};", settings.every_query).unwrap();
    writeln!(f, "pub const PING_AFTER_IDLE_MS: u64 = {};", settings.ping_after_idle_ms).unwrap();
    writeln!(
        f,
        "pub const TIMEOUT_AFTER_IDLE_MS: u64 = {};",
        settings.timeout_after_idle_ms
    )
    .unwrap();
    writeln!(f, "pub const PAN_SCALE: i32 = {};", settings.pan.scale).unwrap();
    writeln!(f, "pub const PAN_REVERSE: bool = {};", settings.pan.reverse).unwrap();
    writeln!(f, "pub const TILT_SCALE: i32 = {};", settings.tilt.scale).unwrap();
    writeln!(f, "pub const TILT_REVERSE: bool = {};", settings.tilt.reverse).unwrap();
}
