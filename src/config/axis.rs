//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::end_switch::EndSwitchPolicy;
use super::units::Microsteps;

/// Complete configuration of one axis.
///
/// Speeds are in full steps per second, acceleration in steps per second
/// squared, travel in steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default)]
    pub name: String<32>,

    /// Microstep setting; the step timer emits this many pulses per step.
    pub microsteps: Microsteps,

    /// Full steps per motor revolution (typically 200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Encoder ticks per motor revolution; `None` if the axis has no encoder.
    #[serde(default)]
    pub encoder_ticks_per_revolution: Option<u32>,

    /// Accepted deviation from the nominal ticks-per-step ratio.
    #[serde(default = "default_encoder_tolerance")]
    pub encoder_tolerance: f32,

    /// Cruise speed.
    pub max_speed: u32,

    /// Start/stop speed, also used for slow moves.
    pub min_speed: u32,

    /// Ramp acceleration (and deceleration).
    pub acceleration: u32,

    /// Travel limit; positions stay within `[-max_steps, max_steps]`.
    pub max_steps: i32,

    /// End-switch reaction.
    #[serde(default)]
    pub end_switch: EndSwitchPolicy,

    /// Keep the driver energized while idle.
    #[serde(default = "default_true")]
    pub hold: bool,

    /// Drive back to the commanded position when the encoder reports drift while idle.
    #[serde(default)]
    pub keep_position: bool,

    /// Invert the direction output.
    #[serde(default)]
    pub reverse: bool,

    /// Invert the encoder count direction.
    #[serde(default)]
    pub encoder_reverse: bool,

    /// Length of the slow move leaving the end switch during homing.
    #[serde(default = "default_homing_backoff")]
    pub homing_backoff_steps: i32,
}

fn default_steps_per_revolution() -> u16 {
    200
}

fn default_encoder_tolerance() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_homing_backoff() -> i32 {
    200
}

impl AxisConfig {
    /// Minimal configuration without encoder; other fields take their defaults.
    pub fn new(microsteps: Microsteps, max_speed: u32, min_speed: u32, acceleration: u32, max_steps: i32) -> Self {
        Self {
            name: String::new(),
            microsteps,
            steps_per_revolution: default_steps_per_revolution(),
            encoder_ticks_per_revolution: None,
            encoder_tolerance: default_encoder_tolerance(),
            max_speed,
            min_speed,
            acceleration,
            max_steps,
            end_switch: EndSwitchPolicy::Ignore,
            hold: true,
            keep_position: false,
            reverse: false,
            encoder_reverse: false,
            homing_backoff_steps: default_homing_backoff(),
        }
    }

    /// Attach an encoder with the given resolution.
    pub fn with_encoder(mut self, ticks_per_revolution: u32) -> Self {
        self.encoder_ticks_per_revolution = Some(ticks_per_revolution);
        self
    }

    /// Set the end-switch policy.
    pub fn with_end_switch(mut self, policy: EndSwitchPolicy) -> Self {
        self.end_switch = policy;
        self
    }

    /// Whether the axis has an encoder.
    #[inline]
    pub fn has_encoder(&self) -> bool {
        self.encoder_ticks_per_revolution.is_some()
    }
}
