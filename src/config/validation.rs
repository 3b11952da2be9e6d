//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, SystemConfig, TimingConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Timing settings are usable
/// - At least one axis is configured
/// - Every axis configuration is valid
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_timing(&config.timing)?;

    if config.axes.is_empty() {
        return Err(Error::Config(ConfigError::NoAxes));
    }

    for axis in config.axes.iter() {
        validate_axis(axis)?;
    }

    Ok(())
}

/// Validate timer and scheduler settings.
pub fn validate_timing(timing: &TimingConfig) -> Result<()> {
    if timing.timer_clock_hz == 0
        || timing.tick_ms == 0
        || timing.min_period == 0
        || timing.min_period > timing.max_period
    {
        return Err(Error::Config(ConfigError::InvalidTiming));
    }
    Ok(())
}

/// Validate a single axis configuration.
///
/// Microsteps are validated when the value is constructed.
pub fn validate_axis(config: &AxisConfig) -> Result<()> {
    if config.min_speed == 0 || config.max_speed < config.min_speed {
        return Err(Error::Config(ConfigError::InvalidSpeed {
            min: config.min_speed,
            max: config.max_speed,
        }));
    }

    if config.acceleration == 0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration,
        )));
    }

    if config.max_steps <= 0 {
        return Err(Error::Config(ConfigError::InvalidTravel(config.max_steps)));
    }

    if config.homing_backoff_steps <= 0 {
        return Err(Error::Config(ConfigError::InvalidHomingBackoff(
            config.homing_backoff_steps,
        )));
    }

    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if let Some(ticks) = config.encoder_ticks_per_revolution {
        if ticks == 0 {
            return Err(Error::Config(ConfigError::InvalidEncoderResolution(ticks)));
        }
        if config.encoder_tolerance.is_nan() || config.encoder_tolerance < 0.0 {
            return Err(Error::Config(ConfigError::InvalidEncoderTolerance(
                config.encoder_tolerance,
            )));
        }
    }

    Ok(())
}
