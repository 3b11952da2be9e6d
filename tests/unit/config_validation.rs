//! Unit tests for configuration validation.

use stepper_supervisor::config::{
    validate_config, validate_timing, AxisConfig, Microsteps, SystemConfig, TimingConfig,
};
use stepper_supervisor::error::{ConfigError, Error};

fn axis() -> AxisConfig {
    AxisConfig::new(Microsteps::EIGHTH, 2000, 100, 4000, 10_000)
}

fn system(axis: AxisConfig) -> SystemConfig {
    let mut config = SystemConfig::default();
    config.axes.push(axis).unwrap();
    config
}

/// Test that a valid configuration passes validation.
#[test]
fn test_valid_config_passes_validation() {
    assert!(validate_config(&system(axis())).is_ok());
    assert!(validate_config(&system(axis().with_encoder(4000))).is_ok());
}

/// Test that an empty axis table is rejected.
#[test]
fn test_empty_config_is_rejected() {
    let result = validate_config(&SystemConfig::default());
    assert!(matches!(result, Err(Error::Config(ConfigError::NoAxes))));
}

/// Test that inverted speed limits are rejected.
#[test]
fn test_inverted_speeds() {
    let mut config = axis();
    config.min_speed = 3000;

    let result = validate_config(&system(config));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidSpeed { min: 3000, max: 2000 }))
    ));
}

/// Test that a zero travel range is rejected.
#[test]
fn test_zero_travel() {
    let mut config = axis();
    config.max_steps = 0;

    let result = validate_config(&system(config));
    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidTravel(0)))));
}

/// Test that a homing back-off towards the switch is rejected.
#[test]
fn test_homing_backoff_towards_switch() {
    let mut config = axis();
    config.homing_backoff_steps = -200;

    let result = validate_config(&system(config));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidHomingBackoff(-200)))
    ));

    let mut config = axis();
    config.homing_backoff_steps = 0;
    assert!(validate_config(&system(config)).is_err());
}

/// Test encoder settings.
#[test]
fn test_invalid_encoder() {
    let result = validate_config(&system(axis().with_encoder(0)));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidEncoderResolution(0)))
    ));

    let mut config = axis().with_encoder(4000);
    config.encoder_tolerance = -1.0;
    let result = validate_config(&system(config));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidEncoderTolerance(_)))
    ));
}

/// Test timer settings.
#[test]
fn test_invalid_timing() {
    assert!(validate_timing(&TimingConfig::default()).is_ok());

    let timing = TimingConfig {
        tick_ms: 0,
        ..TimingConfig::default()
    };
    assert!(matches!(
        validate_timing(&timing),
        Err(Error::Config(ConfigError::InvalidTiming))
    ));

    let timing = TimingConfig {
        min_period: 100,
        max_period: 50,
        ..TimingConfig::default()
    };
    assert!(validate_timing(&timing).is_err());
}
