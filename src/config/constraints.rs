//! Parameters derived from axis configuration.

use super::axis::AxisConfig;
use crate::motion::profile::accdec_steps;

/// Encoder scaling of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderScale {
    /// Ticks per motor revolution.
    pub ticks_per_revolution: u32,
    /// Nominal ticks per full step.
    pub per_step: f32,
    /// Lowest ticks-per-step ratio still considered healthy motion.
    pub per_step_min: f32,
    /// Highest ticks-per-step ratio still considered healthy motion.
    pub per_step_max: f32,
}

/// Derived parameters computed from axis configuration.
///
/// These are computed once at (re)configuration and used for all motion planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConstraints {
    /// Pulses per full step.
    pub microsteps: u16,

    /// log2 of `microsteps`.
    pub microstep_shift: u8,

    /// Encoder scaling, if the axis has an encoder.
    pub encoder: Option<EncoderScale>,

    /// Steps needed to ramp between standstill and `max_speed`.
    pub accdec_steps: i32,

    /// Cruise speed in steps/s.
    pub max_speed: u32,

    /// Start/stop speed in steps/s.
    pub min_speed: u32,

    /// Ramp rate in steps/s².
    pub acceleration: u32,

    /// Travel limit in steps.
    pub max_steps: i32,
}

impl AxisConstraints {
    /// Compute constraints from axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        let encoder = config.encoder_ticks_per_revolution.map(|ticks| {
            let per_step = ticks as f32 / config.steps_per_revolution.max(1) as f32;
            let tolerance = config.encoder_tolerance.max(0.0);
            EncoderScale {
                ticks_per_revolution: ticks,
                per_step,
                per_step_min: (per_step - tolerance).max(0.0),
                per_step_max: per_step + tolerance,
            }
        });

        Self {
            microsteps: config.microsteps.value(),
            microstep_shift: config.microsteps.shift(),
            encoder,
            accdec_steps: accdec_steps(config.max_speed, config.acceleration),
            max_speed: config.max_speed,
            min_speed: config.min_speed,
            acceleration: config.acceleration,
            max_steps: config.max_steps,
        }
    }

    /// Whether a position lies inside the travel range.
    #[inline]
    pub fn in_travel(&self, steps: i64) -> bool {
        steps >= -(self.max_steps as i64) && steps <= self.max_steps as i64
    }
}
