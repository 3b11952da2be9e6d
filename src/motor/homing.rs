//! Homing sequence.
//!
//! Fast approach towards the negative end switch with the policy forced to
//! [`EndSwitchPolicy::StopMinus`], then a slow move back off the switch that
//! stops on the step the switch releases. After the axis has stood still for
//! [`HOMING_SETTLE_TICKS`] scheduler ticks its position and encoder are zeroed.

use crate::config::EndSwitchPolicy;
use crate::error::{MotorError, Result};
use crate::hal::AxisHardware;
use crate::motion::StepTiming;

use super::axis::Axis;
use super::state::{HomingState, MotionState};

/// Scheduler ticks the axis must stand still before the zero is taken.
pub const HOMING_SETTLE_TICKS: u8 = 5;

impl<H: AxisHardware> Axis<H> {
    /// Begin homing.
    ///
    /// Only a RELAX or STALL axis can home; ERR has to be cleared first.
    pub(crate) fn go_home(&mut self, timing: &StepTiming) -> Result<()> {
        if !self.state.is_stopped() || self.homing != HomingState::None {
            return Err(MotorError::Busy(self.state).into());
        }

        self.policy = EndSwitchPolicy::StopMinus;
        self.homing = HomingState::Fast;
        self.settle_ticks = 0;

        if self.hw.end_switch_active() {
            debug!("{}: already on the end switch", self.config.name.as_str());
            return Ok(());
        }

        let target = -(self.constraints.max_steps as i64);
        if let Err(e) = self.start_move(target, false, timing) {
            self.fail_homing();
            return Err(e);
        }
        info!("{}: homing", self.config.name.as_str());
        Ok(())
    }

    /// Leave the homing sequence and restore the configured policy.
    pub(crate) fn abort_homing(&mut self) {
        self.homing = HomingState::None;
        self.settle_ticks = 0;
        self.policy = self.config.end_switch;
    }

    fn fail_homing(&mut self) {
        error!("{}: homing failed", self.config.name.as_str());
        self.abort_homing();
        self.state = MotionState::Err;
    }

    /// Advance the homing sequence by one scheduler tick.
    pub(crate) fn homing_tick(&mut self, timing: &StepTiming) {
        match self.homing {
            HomingState::None => {}
            HomingState::Fast => {
                if !self.state.is_stopped() {
                    return;
                }
                let max = self.constraints.max_steps as i64;
                let backoff = (self.position() as i64 + self.config.homing_backoff_steps as i64)
                    .clamp(-max, max);
                match self.start_move(backoff, true, timing) {
                    Ok(()) => {
                        self.homing = HomingState::Slow;
                        self.settle_ticks = 0;
                    }
                    Err(_) => self.fail_homing(),
                }
            }
            HomingState::Slow => {
                if self.state.is_moving() {
                    self.settle_ticks = 0;
                    if !self.stop_at_step && !self.hw.end_switch_active() {
                        trace!("{}: left the end switch", self.config.name.as_str());
                        self.stop_at_step = true;
                    }
                    return;
                }

                self.settle_ticks = self.settle_ticks.saturating_add(1);
                if self.settle_ticks >= HOMING_SETTLE_TICKS {
                    self.place(0, Some(0));
                    self.abort_homing();
                    info!("{}: homed", self.config.name.as_str());
                }
            }
        }
    }
}
