//! Unit tests for TOML configuration parsing.

use stepper_supervisor::config::{load_config, parse_config, EndSwitchPolicy, SystemConfig};
use stepper_supervisor::error::{ConfigError, Error};

/// Test parsing a valid axis configuration from TOML.
#[test]
fn test_parse_axis_config() {
    let toml_str = r#"
[[axes]]
name = "main_axis"
microsteps = 16
steps_per_revolution = 400
max_speed = 3000
min_speed = 150
acceleration = 6000
max_steps = 40000
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis(0).expect("Axis not found");

    assert_eq!(axis.name.as_str(), "main_axis");
    assert_eq!(axis.microsteps.value(), 16);
    assert_eq!(axis.steps_per_revolution, 400);
    assert_eq!(axis.max_speed, 3000);
    assert_eq!(axis.min_speed, 150);
    assert_eq!(axis.acceleration, 6000);
    assert_eq!(axis.max_steps, 40000);
}

/// Test that omitted fields take their defaults.
#[test]
fn test_axis_defaults() {
    let toml_str = r#"
[[axes]]
microsteps = 1
max_speed = 1000
min_speed = 100
acceleration = 2000
max_steps = 1000
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis(0).expect("Axis not found");

    assert_eq!(axis.steps_per_revolution, 200);
    assert_eq!(axis.encoder_ticks_per_revolution, None);
    assert_eq!(axis.end_switch, EndSwitchPolicy::Ignore);
    assert!(axis.hold);
    assert!(!axis.keep_position);
    assert!(!axis.reverse);
    assert!(!axis.encoder_reverse);
    assert_eq!(axis.homing_backoff_steps, 200);

    assert_eq!(config.timing.timer_clock_hz, 1_000_000);
    assert_eq!(config.timing.tick_ms, 10);
}

/// Test parsing a multi-axis table with timing overrides.
#[test]
fn test_parse_multi_axis_with_timing() {
    let toml_str = r#"
[timing]
timer_clock_hz = 8000000
tick_ms = 5
min_period = 10

[[axes]]
name = "x"
microsteps = 8
max_speed = 2000
min_speed = 100
acceleration = 4000
max_steps = 50000
end_switch = "stop_any"

[[axes]]
name = "y"
microsteps = 4
encoder_ticks_per_revolution = 4096
encoder_tolerance = 2.5
encoder_reverse = true
max_speed = 1500
min_speed = 50
acceleration = 3000
max_steps = 25000
end_switch = "stop_minus"
hold = false
keep_position = true
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.axes.len(), 2);
    assert_eq!(config.timing.timer_clock_hz, 8_000_000);
    assert_eq!(config.timing.min_period, 10);
    assert_eq!(config.axis_index("y"), Some(1));

    let names: Vec<&str> = config.axis_names().collect();
    assert_eq!(names, ["x", "y"]);

    let y = config.axis(1).unwrap();
    assert!(y.has_encoder());
    assert_eq!(y.encoder_tolerance, 2.5);
    assert!(y.encoder_reverse);
    assert!(!y.hold);
    assert_eq!(y.end_switch, EndSwitchPolicy::StopMinus);
}

/// Test that invalid microstep values are rejected during parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let toml_str = r#"
[[axes]]
microsteps = 12
max_speed = 1000
min_speed = 100
acceleration = 2000
max_steps = 1000
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err(), "Should reject non-power-of-2 microsteps");
}

/// Test that unknown end-switch policies are rejected.
#[test]
fn test_unknown_policy_rejected() {
    let toml_str = r#"
[[axes]]
microsteps = 1
max_speed = 1000
min_speed = 100
acceleration = 2000
max_steps = 1000
end_switch = "stop_plus"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test loading from a file that does not exist.
#[test]
fn test_load_missing_file() {
    assert!(matches!(
        load_config("/nonexistent/axes.toml"),
        Err(Error::Config(ConfigError::IoError(_)))
    ));
}
