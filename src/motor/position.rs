//! Position tracking for stepper axes.
//!
//! Counts step pulses into full steps and keeps the encoder's revolution
//! accumulator, from which the authoritative position of encoder axes is
//! derived.

use libm::round;

use crate::config::EncoderScale;
use crate::hal::AxisHardware;
use crate::motion::Direction;

/// Step position derived from an absolute encoder count, rounded half away from zero.
#[inline]
pub fn position_from_ticks(ticks: i32, per_step: f32) -> i32 {
    if per_step <= 0.0 {
        return 0;
    }
    round(ticks as f64 / per_step as f64) as i32
}

/// Encoder count corresponding to a step position.
#[inline]
pub fn ticks_from_position(steps: i32, per_step: f32) -> i32 {
    round(steps as f64 * per_step as f64) as i32
}

/// Per-axis position tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionTracker {
    /// Position in full steps.
    position: i32,
    /// Pulses counted towards the next full step.
    pulses: u16,
    /// Whole encoder revolutions (raw counter direction).
    revolutions: i32,
}

impl PositionTracker {
    /// Tracker at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in steps.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Set the position and restart microstep counting.
    pub fn set_position(&mut self, steps: i32) {
        self.position = steps;
        self.pulses = 0;
    }

    /// Overwrite the position, keeping the microstep phase.
    #[inline]
    pub fn resync(&mut self, steps: i32) {
        self.position = steps;
    }

    /// Restart microstep counting.
    #[inline]
    pub fn reset_pulses(&mut self) {
        self.pulses = 0;
    }

    /// Count one step pulse.
    ///
    /// Returns `true` when the pulse completed a full step.
    pub fn pulse(&mut self, direction: Direction, microsteps: u16) -> bool {
        self.pulses += 1;
        if self.pulses < microsteps {
            return false;
        }
        self.pulses = 0;
        self.position = self.position.saturating_add(direction.sign());
        true
    }

    /// Account for one encoder wrap.
    pub fn on_overflow(&mut self, direction: Direction) {
        self.revolutions = self.revolutions.wrapping_add(direction.sign());
    }

    /// Absolute encoder count: revolutions plus the live register.
    pub fn encoder_ticks<H: AxisHardware>(
        &self,
        hw: &mut H,
        scale: &EncoderScale,
        reverse: bool,
    ) -> i32 {
        let raw = self.revolutions as i64 * scale.ticks_per_revolution as i64
            + hw.encoder_count() as i64;
        let abs = if reverse { -raw } else { raw };
        abs.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Set the absolute encoder count, writing the sub-revolution part to the counter.
    pub fn set_encoder_ticks<H: AxisHardware>(
        &mut self,
        hw: &mut H,
        scale: &EncoderScale,
        reverse: bool,
        ticks: i32,
    ) {
        let raw = if reverse { -(ticks as i64) } else { ticks as i64 };
        let per_rev = scale.ticks_per_revolution.max(1) as i64;
        self.revolutions = raw.div_euclid(per_rev) as i32;
        hw.set_encoder_count(raw.rem_euclid(per_rev) as u32);
    }
}
