//! Multi-axis motion controller.
//!
//! Owns every axis and exposes the command interface, the periodic scheduler
//! and the interrupt entry points.

use heapless::Vec;

use crate::config::{AxisConfig, MAX_AXES};
use crate::error::{MotorError, Result};
use crate::hal::AxisHardware;
use crate::motion::{Direction, StepTiming};

use super::axis::Axis;
use super::builder::MotionControllerBuilder;
use super::state::{HomingState, MotionState};

/// Supervisor for up to [`MAX_AXES`] axes.
///
/// Commands are synchronous and either accepted or rejected immediately; the
/// motion itself is carried out by [`process`](Self::process), which the
/// main loop calls with a millisecond clock, and by
/// [`on_step_pulse`](Self::on_step_pulse), called from each axis' step timer
/// interrupt.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_supervisor::{load_config, MotionController};
///
/// let config = load_config("axes.toml")?;
/// let mut ctrl = MotionController::builder()
///     .from_config(&config, [x_hw, y_hw])
///     .build()?;
/// ctrl.init();
///
/// ctrl.move_to(0, 1000)?;
/// loop {
///     ctrl.process(millis());
/// }
/// ```
pub struct MotionController<H: AxisHardware> {
    axes: Vec<Axis<H>, MAX_AXES>,
    timing: StepTiming,
    tick_ms: u32,
    last_run: Option<u32>,
}

impl<H: AxisHardware> MotionController<H> {
    /// Start building a controller.
    pub fn builder() -> MotionControllerBuilder<H> {
        MotionControllerBuilder::new()
    }

    pub(crate) fn from_parts(axes: Vec<Axis<H>, MAX_AXES>, timing: StepTiming, tick_ms: u32) -> Self {
        Self {
            axes,
            timing,
            tick_ms,
            last_run: None,
        }
    }

    /// Number of axes.
    #[inline]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Read access to one axis.
    pub fn axis(&self, axis: usize) -> Option<&Axis<H>> {
        self.axes.get(axis)
    }

    /// Hardware of one axis.
    pub fn hardware(&self, axis: usize) -> Option<&H> {
        self.axes.get(axis).map(Axis::hardware)
    }

    /// Mutable hardware of one axis.
    pub fn hardware_mut(&mut self, axis: usize) -> Option<&mut H> {
        self.axes.get_mut(axis).map(Axis::hardware_mut)
    }

    fn get(&self, axis: usize) -> Result<&Axis<H>> {
        self.axes
            .get(axis)
            .ok_or_else(|| MotorError::InvalidAxis(axis).into())
    }

    fn get_mut(&mut self, axis: usize) -> Result<&mut Axis<H>> {
        self.axes
            .get_mut(axis)
            .ok_or_else(|| MotorError::InvalidAxis(axis).into())
    }

    /// Put every axis into RELAX.
    ///
    /// Positions are kept; encoder axes take theirs from the encoder.
    pub fn init(&mut self) {
        for axis in self.axes.iter_mut() {
            axis.reset();
        }
        self.last_run = None;
        info!("{} axes ready", self.axes.len());
    }

    // ===== Motion commands =====

    /// Move to an absolute position.
    ///
    /// # Errors
    ///
    /// - [`MotorError::InvalidAxis`], [`MotorError::TargetOutOfRange`]
    /// - [`MotorError::Busy`] unless the axis is in RELAX or STALL
    /// - [`MotorError::StallLockout`] when retrying the stalled direction
    /// - [`MotorError::EndSwitchBlocked`] when the active end switch forbids the direction
    pub fn move_to(&mut self, axis: usize, target: i32) -> Result<()> {
        let timing = self.timing;
        self.get_mut(axis)?.start_move(target as i64, false, &timing)
    }

    /// Move relative to the current position.
    pub fn move_by(&mut self, axis: usize, delta: i32) -> Result<()> {
        let timing = self.timing;
        let axis = self.get_mut(axis)?;
        let target = axis.position() as i64 + delta as i64;
        axis.start_move(target, false, &timing)
    }

    /// Move relative to the current position at min speed, without ramps.
    pub fn move_by_slow(&mut self, axis: usize, delta: i32) -> Result<()> {
        let timing = self.timing;
        let axis = self.get_mut(axis)?;
        let target = axis.position() as i64 + delta as i64;
        axis.start_move(target, true, &timing)
    }

    /// Start the homing sequence.
    pub fn go_home(&mut self, axis: usize) -> Result<()> {
        let timing = self.timing;
        self.get_mut(axis)?.go_home(&timing)
    }

    /// Decelerate to a stop; aborts homing.
    pub fn stop(&mut self, axis: usize) -> Result<()> {
        let axis = self.get_mut(axis)?;
        axis.abort_homing();
        axis.stop();
        Ok(())
    }

    /// Stop at the next step without ramping; clears STALL and ERR and aborts homing.
    pub fn emergency_stop(&mut self, axis: usize) -> Result<()> {
        let axis = self.get_mut(axis)?;
        axis.abort_homing();
        axis.emergency_stop();
        Ok(())
    }

    /// Emergency-stop every axis.
    pub fn emergency_stop_all(&mut self) {
        for axis in self.axes.iter_mut() {
            axis.abort_homing();
            axis.emergency_stop();
        }
    }

    // ===== Queries =====

    /// Motion state of an axis.
    pub fn state(&self, axis: usize) -> Result<MotionState> {
        Ok(self.get(axis)?.state())
    }

    /// Homing phase of an axis.
    pub fn homing_state(&self, axis: usize) -> Result<HomingState> {
        Ok(self.get(axis)?.homing_state())
    }

    /// Position of an axis in steps.
    pub fn position(&self, axis: usize) -> Result<i32> {
        Ok(self.get(axis)?.position())
    }

    /// Steps left until the target.
    pub fn remaining_steps(&self, axis: usize) -> Result<u32> {
        Ok(self.get(axis)?.remaining_steps())
    }

    /// Absolute encoder count.
    pub fn encoder_position(&mut self, axis: usize) -> Result<i32> {
        self.get_mut(axis)?
            .encoder_position()
            .ok_or_else(|| MotorError::NoEncoder.into())
    }

    /// Whether any axis is moving.
    pub fn is_busy(&self) -> bool {
        self.axes.iter().any(|a| a.state().is_moving())
    }

    // ===== Setters =====

    /// Overwrite the step position. RELAX only.
    pub fn set_position(&mut self, axis: usize, steps: i32) -> Result<()> {
        self.get_mut(axis)?.set_position(steps)
    }

    /// Overwrite the encoder count. RELAX only.
    pub fn set_encoder_position(&mut self, axis: usize, ticks: i32) -> Result<()> {
        self.get_mut(axis)?.set_encoder_position(ticks)
    }

    /// Replace an axis' configuration. RELAX only.
    pub fn reconfigure(&mut self, axis: usize, config: AxisConfig) -> Result<()> {
        self.get_mut(axis)?.reconfigure(config)
    }

    // ===== Scheduler =====

    /// Run the scheduler if a tick has elapsed.
    ///
    /// `now_ms` is a free-running millisecond counter; wraparound is handled.
    /// Returns `true` if a tick ran.
    pub fn process(&mut self, now_ms: u32) -> bool {
        if let Some(last) = self.last_run {
            if now_ms.wrapping_sub(last) < self.tick_ms {
                return false;
            }
        }
        self.last_run = Some(now_ms);

        let timing = self.timing;
        for axis in self.axes.iter_mut() {
            axis.relax_tick(&timing);
            axis.motion_tick(now_ms, &timing);
            axis.homing_tick(&timing);
        }
        true
    }

    // ===== Interrupt entry points =====

    /// Step timer interrupt of an axis. Unknown axes are ignored.
    #[inline]
    pub fn on_step_pulse(&mut self, axis: usize) {
        if let Some(axis) = self.axes.get_mut(axis) {
            axis.on_step_pulse();
        }
    }

    /// Encoder counter wrap of an axis. Unknown axes are ignored.
    #[inline]
    pub fn on_encoder_overflow(&mut self, axis: usize, direction: Direction) {
        if let Some(axis) = self.axes.get_mut(axis) {
            axis.on_encoder_overflow(direction);
        }
    }
}
