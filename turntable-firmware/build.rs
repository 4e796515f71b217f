//! Build script for turntable-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates turntable.toml at compile time
//! - Renders the validated configuration into `$OUT_DIR/config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use turntable_core::config::{ConfigError, TurntableConfig};
use turntable_core::menu::OverridePolicy;

fn main() {
    setup_linker();
    let config = load_config();
    write_config(&config);
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read turntable.toml, fill in defaults and validate it
fn load_config() -> TurntableConfig {
    println!("cargo:rerun-if-changed=turntable.toml");

    let config_path = Path::new("turntable.toml");

    if !config_path.exists() {
        println!("cargo:warning=turntable.toml not found, using built-in defaults");
        return TurntableConfig::default();
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read turntable.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: TurntableConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid turntable.toml                                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in turntable.toml                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&describe(&e))
        );
    }

    println!("cargo:warning=turntable.toml validated successfully");
    config
}

/// Human-readable explanation of a validation failure
fn describe(e: &ConfigError) -> String {
    match e {
        ConfigError::NoStepsPerTurn => {
            "[mechanics] steps_per_rev and microsteps must be non-zero".to_string()
        }
        ConfigError::StepResolution { steps_360 } => format!(
            "[mechanics] {} steps per turn cannot resolve whole degrees\n\
             (steps_per_rev * microsteps must exceed 720)",
            steps_360
        ),
        ConfigError::StepOverflow => {
            "[mechanics] steps_per_rev * microsteps overflows a 32-bit step count".to_string()
        }
        ConfigError::DelayOrder => {
            "[motion] delays must satisfy 0 < min_delay_us <= accel_delay_us <= max_delay_us"
                .to_string()
        }
        ConfigError::DecelWindow => "[motion] decel_start_steps must be non-zero".to_string(),
        ConfigError::PulseWidth => "[motion] step_pulse_us must be non-zero".to_string(),
        ConfigError::SensorScale => {
            "[sensor] ref_voltage and max_angle must be positive".to_string()
        }
        ConfigError::ZeroSamples => "[sensor] zero_samples must be non-zero".to_string(),
        ConfigError::PositionBounds { min, max } => format!(
            "[storage] bounds {}..={} must be ordered and within one turn",
            min, max
        ),
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

/// Emit the configuration as a `const` the firmware includes
fn write_config(config: &TurntableConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let policy = match config.ui.override_policy {
        OverridePolicy::ExplicitReset => "OverridePolicy::ExplicitReset".to_string(),
        OverridePolicy::AutoClearOnDrift { threshold_deg } => format!(
            "OverridePolicy::AutoClearOnDrift {{ threshold_deg: {} }}",
            threshold_deg
        ),
    };

    let m = &config.mechanics;
    let mo = &config.motion;
    let s = &config.sensor;
    let u = &config.ui;
    let st = &config.storage;

    let source = format!(
        "// Generated from turntable.toml by build.rs\n\
         \n\
         use turntable_core::config::{{\n\
         \x20   MechanicsConfig, MotionConfig, SensorConfig, StorageConfig, TurntableConfig, UiConfig,\n\
         }};\n\
         use turntable_core::menu::OverridePolicy;\n\
         \n\
         pub const CONFIG: TurntableConfig = TurntableConfig {{\n\
         \x20   mechanics: MechanicsConfig {{ steps_per_rev: {}, microsteps: {} }},\n\
         \x20   motion: MotionConfig {{\n\
         \x20       accel_delay_us: {},\n\
         \x20       min_delay_us: {},\n\
         \x20       max_delay_us: {},\n\
         \x20       ramp_decrement_us: {},\n\
         \x20       decel_start_steps: {},\n\
         \x20       step_pulse_us: {},\n\
         \x20       dir_settle_us: {},\n\
         \x20       enable_active_low: {},\n\
         \x20   }},\n\
         \x20   sensor: SensorConfig {{\n\
         \x20       ref_voltage: {:?},\n\
         \x20       max_angle: {:?},\n\
         \x20       poll_interval_ms: {},\n\
         \x20       zero_samples: {},\n\
         \x20       zero_settle_ms: {},\n\
         \x20       zero_sample_interval_us: {},\n\
         \x20       zero_snap_deg: {:?},\n\
         \x20   }},\n\
         \x20   ui: UiConfig {{\n\
         \x20       menu_change_delay_ms: {},\n\
         \x20       long_press_ms: {},\n\
         \x20       debounce_ms: {},\n\
         \x20       fine_step_repeat_delay_ms: {},\n\
         \x20       fine_step_repeat_interval_ms: {},\n\
         \x20       reach_tolerance_steps: {},\n\
         \x20       override_policy: {},\n\
         \x20   }},\n\
         \x20   storage: StorageConfig {{ base_address: {}, min_pos: {}, max_pos: {} }},\n\
         }};\n",
        m.steps_per_rev,
        m.microsteps,
        mo.accel_delay_us,
        mo.min_delay_us,
        mo.max_delay_us,
        mo.ramp_decrement_us,
        mo.decel_start_steps,
        mo.step_pulse_us,
        mo.dir_settle_us,
        mo.enable_active_low,
        s.ref_voltage,
        s.max_angle,
        s.poll_interval_ms,
        s.zero_samples,
        s.zero_settle_ms,
        s.zero_sample_interval_us,
        s.zero_snap_deg,
        u.menu_change_delay_ms,
        u.long_press_ms,
        u.debounce_ms,
        u.fine_step_repeat_delay_ms,
        u.fine_step_repeat_interval_ms,
        u.reach_tolerance_steps,
        policy,
        st.base_address,
        st.min_pos,
        st.max_pos,
    );

    let mut f = File::create(out_dir.join("config.rs")).unwrap();
    f.write_all(source.as_bytes()).unwrap();
}
