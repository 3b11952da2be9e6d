//! Runtime state of one axis.
//!
//! An [`Axis`] owns its hardware and carries the motion state machine:
//!
//! ```text
//! RELAX/STALL --move_to--> ACCEL --speed >= max--> MOVE
//! ACCEL/MOVE --decel start or stop--> DECEL --speed <= min--> MVSLOW
//! moving --target, end switch, travel limit or stop at next step--> RELAX
//! moving --persistent stall--> STALL
//! ```
//!
//! Profile and stall supervision run from the scheduler tick; step counting
//! and the stop conditions run from the step interrupt.

use crate::config::{validate_axis, AxisConfig, AxisConstraints, EncoderScale, EndSwitchPolicy};
use crate::error::{MotorError, Result};
use crate::hal::AxisHardware;
use crate::motion::profile::{braking_distance, decel_start, reached};
use crate::motion::{Direction, Ramp, StallDetector, StallVerdict, StepTiming};

use super::position::{position_from_ticks, ticks_from_position, PositionTracker};
use super::state::{HomingState, MotionState};

/// One stepper axis.
pub struct Axis<H: AxisHardware> {
    pub(super) hw: H,
    pub(super) config: AxisConfig,
    pub(super) constraints: AxisConstraints,
    pub(super) tracker: PositionTracker,
    pub(super) stall: StallDetector,
    pub(super) state: MotionState,
    pub(super) homing: HomingState,
    pub(super) settle_ticks: u8,
    /// Policy in force; differs from the configured one while homing.
    pub(super) policy: EndSwitchPolicy,
    pub(super) target: i32,
    decel_start: i32,
    direction: Option<Direction>,
    speed: u32,
    ramp: Ramp,
    stop_requested: bool,
    pub(super) stop_at_step: bool,
    stalled: bool,
    stall_lock: Option<Direction>,
}

impl<H: AxisHardware> Axis<H> {
    /// Create an axis at position 0, relaxed.
    ///
    /// The configuration must already be validated.
    pub(crate) fn new(config: AxisConfig, hw: H) -> Self {
        let constraints = AxisConstraints::from_config(&config);
        let policy = config.end_switch;
        let mut axis = Self {
            hw,
            config,
            constraints,
            tracker: PositionTracker::new(),
            stall: StallDetector::new(),
            state: MotionState::Relax,
            homing: HomingState::None,
            settle_ticks: 0,
            policy,
            target: 0,
            decel_start: 0,
            direction: None,
            speed: 0,
            ramp: Ramp::default(),
            stop_requested: false,
            stop_at_step: false,
            stalled: false,
            stall_lock: None,
        };
        if let Some(scale) = axis.constraints.encoder {
            axis.write_encoder_ticks(&scale, 0);
        }
        axis
    }

    /// Current motion state.
    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Current homing phase.
    #[inline]
    pub fn homing_state(&self) -> HomingState {
        self.homing
    }

    /// Position in steps.
    #[inline]
    pub fn position(&self) -> i32 {
        self.tracker.position()
    }

    /// Target of the current (or last) move.
    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    /// Steps left until the target.
    #[inline]
    pub fn remaining_steps(&self) -> u32 {
        (self.target as i64 - self.position() as i64).unsigned_abs() as u32
    }

    /// Position where braking starts for the current move.
    #[inline]
    pub fn decel_start(&self) -> i32 {
        self.decel_start
    }

    /// Speed currently programmed into the step timer, 0 when idle.
    #[inline]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Direction of the current move.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Consecutive bad stall samples.
    #[inline]
    pub fn stall_count(&self) -> u8 {
        self.stall.count()
    }

    /// Direction refused after a stall.
    #[inline]
    pub fn stall_lock(&self) -> Option<Direction> {
        self.stall_lock
    }

    /// End-switch policy in force.
    #[inline]
    pub fn end_switch_policy(&self) -> EndSwitchPolicy {
        self.policy
    }

    /// Axis configuration.
    #[inline]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Parameters derived from the configuration.
    #[inline]
    pub fn constraints(&self) -> &AxisConstraints {
        &self.constraints
    }

    /// Hardware of the axis.
    #[inline]
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Mutable hardware of the axis.
    #[inline]
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    fn name(&self) -> &str {
        self.config.name.as_str()
    }

    // ===== Commands =====

    /// Start a move to an absolute target.
    pub(crate) fn start_move(&mut self, target: i64, slow: bool, timing: &StepTiming) -> Result<()> {
        if !self.constraints.in_travel(target) {
            return Err(MotorError::TargetOutOfRange {
                target,
                max: self.constraints.max_steps,
            }
            .into());
        }
        let target = target as i32;

        if !self.state.is_stopped() {
            return Err(MotorError::Busy(self.state).into());
        }

        let position = self.position();
        if target == position {
            return Ok(());
        }

        let direction = Direction::from_steps(target as i64 - position as i64);
        let resuming = self.state == MotionState::Stall;
        if resuming && self.stall_lock == Some(direction) {
            warn!("{}: stalled moving that way, move refused", self.name());
            return Err(MotorError::StallLockout(direction).into());
        }
        if self.policy.check(direction, self.hw.end_switch_active()) {
            warn!("{}: end switch blocks the move", self.name());
            return Err(MotorError::EndSwitchBlocked(direction).into());
        }

        self.stall.forgive(resuming);
        self.stall_lock = None;
        self.stalled = false;
        self.stop_requested = false;
        self.stop_at_step = false;
        self.tracker.reset_pulses();
        if let Some(scale) = self.constraints.encoder {
            let ticks = self.read_encoder_ticks(&scale);
            self.stall.rebase(position, ticks);
        }

        self.target = target;
        self.direction = Some(direction);
        self.hw
            .set_direction((direction == Direction::Clockwise) != self.config.reverse);
        self.hw.enable();

        let min_speed = self.constraints.min_speed;
        self.apply_speed(min_speed, timing);
        self.ramp = Ramp::new(min_speed);
        if slow {
            self.decel_start = target;
            self.state = MotionState::MvSlow;
        } else {
            self.decel_start = decel_start(position, target, self.constraints.accdec_steps);
            self.state = MotionState::Accel;
        }

        info!(
            "{}: {} -> {}, decel at {}",
            self.name(),
            position,
            target,
            self.decel_start
        );
        self.hw.start_step_timer();
        Ok(())
    }

    /// Bring the axis to a controlled stop.
    pub(crate) fn stop(&mut self) {
        match self.state {
            MotionState::Relax | MotionState::Stall | MotionState::Err => {}
            MotionState::MvSlow => self.stop_at_step = true,
            MotionState::Accel | MotionState::Move | MotionState::Decel => {
                if let Some(direction) = self.direction {
                    let brake = braking_distance(self.speed, self.constraints.acceleration);
                    let max = self.constraints.max_steps as i64;
                    let stop_at = (self.position() as i64 + direction.sign() as i64 * brake as i64)
                        .clamp(-max, max) as i32;
                    if !reached(stop_at, self.target, direction) {
                        self.target = stop_at;
                    }
                }
                self.stop_requested = true;
                debug!("{}: stop requested, target {}", self.name(), self.target);
            }
        }
    }

    /// Stop at the next step without ramping; clears STALL and ERR.
    pub(crate) fn emergency_stop(&mut self) {
        match self.state {
            MotionState::Relax => {}
            MotionState::Stall | MotionState::Err => {
                info!("{}: {} cleared", self.name(), self.state.name());
                self.state = MotionState::Relax;
                self.stall_lock = None;
                self.stalled = false;
            }
            _ => self.stop_at_step = true,
        }
    }

    /// Overwrite the step position. RELAX only.
    pub(crate) fn set_position(&mut self, steps: i32) -> Result<()> {
        if self.state != MotionState::Relax {
            return Err(MotorError::Busy(self.state).into());
        }
        if !self.constraints.in_travel(steps as i64) {
            return Err(MotorError::TargetOutOfRange {
                target: steps as i64,
                max: self.constraints.max_steps,
            }
            .into());
        }
        self.place(steps, None);
        Ok(())
    }

    /// Overwrite the encoder count and derive the step position from it. RELAX only.
    pub(crate) fn set_encoder_position(&mut self, ticks: i32) -> Result<()> {
        let scale = self.constraints.encoder.ok_or(MotorError::NoEncoder)?;
        if self.state != MotionState::Relax {
            return Err(MotorError::Busy(self.state).into());
        }
        let steps = position_from_ticks(ticks, scale.per_step);
        if !self.constraints.in_travel(steps as i64) {
            return Err(MotorError::TargetOutOfRange {
                target: steps as i64,
                max: self.constraints.max_steps,
            }
            .into());
        }
        self.place(steps, Some(ticks));
        Ok(())
    }

    /// Absolute encoder count, if the axis has an encoder.
    pub fn encoder_position(&mut self) -> Option<i32> {
        let scale = self.constraints.encoder?;
        Some(self.read_encoder_ticks(&scale))
    }

    /// Replace the configuration. RELAX only.
    pub(crate) fn reconfigure(&mut self, config: AxisConfig) -> Result<()> {
        if self.state != MotionState::Relax || self.homing != HomingState::None {
            return Err(MotorError::Busy(self.state).into());
        }
        validate_axis(&config)?;

        self.constraints = AxisConstraints::from_config(&config);
        self.policy = config.end_switch;
        self.config = config;

        let max = self.constraints.max_steps;
        let position = self.position().clamp(-max, max);
        self.place(position, None);
        if self.config.hold {
            self.hw.enable();
        } else {
            self.hw.disable();
        }
        info!("{}: reconfigured", self.name());
        Ok(())
    }

    /// Put the axis into RELAX, keeping its position.
    pub(crate) fn reset(&mut self) {
        self.hw.stop_step_timer();
        self.state = MotionState::Relax;
        self.homing = HomingState::None;
        self.settle_ticks = 0;
        self.policy = self.config.end_switch;
        self.speed = 0;
        self.ramp = Ramp::default();
        self.direction = None;
        self.stop_requested = false;
        self.stop_at_step = false;
        self.stalled = false;
        self.stall_lock = None;
        self.stall.forgive(false);

        if let Some(scale) = self.constraints.encoder {
            let ticks = self.read_encoder_ticks(&scale);
            let position = self.clamp_to_travel(position_from_ticks(ticks, scale.per_step));
            self.tracker.set_position(position);
            self.stall.rebase(position, ticks);
        } else {
            self.tracker.reset_pulses();
        }
        self.target = self.position();

        if self.config.hold {
            self.hw.enable();
        } else {
            self.hw.disable();
        }
    }

    // ===== Step interrupt =====

    /// Handle one step pulse.
    pub(crate) fn on_step_pulse(&mut self) {
        if !self.state.is_moving() {
            return;
        }
        let Some(direction) = self.direction else {
            return;
        };
        // Stop conditions, the end switch included, are evaluated on full steps only.
        if !self.tracker.pulse(direction, self.constraints.microsteps) {
            return;
        }

        let position = self.position();
        if self.stop_at_step {
            let next = if self.stalled {
                MotionState::Stall
            } else {
                MotionState::Relax
            };
            self.finish(next);
        } else if reached(position, self.target, direction) {
            self.finish(MotionState::Relax);
        } else if self.policy.check(direction, self.hw.end_switch_active()) {
            debug!("{}: end switch hit at {}", self.name(), position);
            self.finish(MotionState::Relax);
        } else if reached(position, direction.sign() * self.constraints.max_steps, direction) {
            warn!("{}: travel limit at {}", self.name(), position);
            self.finish(MotionState::Relax);
        }
    }

    /// Handle an encoder counter wrap.
    pub(crate) fn on_encoder_overflow(&mut self, direction: Direction) {
        self.tracker.on_overflow(direction);
    }

    fn finish(&mut self, next: MotionState) {
        self.hw.stop_step_timer();
        self.state = next;
        self.speed = 0;
        self.ramp = Ramp::default();
        self.target = self.position();
        self.direction = None;
        self.stop_requested = false;
        self.stop_at_step = false;
        self.stalled = false;
        if !self.config.hold {
            self.hw.disable();
        }
    }

    // ===== Scheduler tick =====

    /// Position upkeep while relaxed.
    pub(crate) fn relax_tick(&mut self, timing: &StepTiming) {
        if self.state != MotionState::Relax {
            return;
        }
        let Some(scale) = self.constraints.encoder else {
            return;
        };

        let ticks = self.read_encoder_ticks(&scale);
        let position = self.clamp_to_travel(position_from_ticks(ticks, scale.per_step));
        self.tracker.resync(position);
        self.stall.rebase(position, ticks);

        if self.config.keep_position && position != self.target {
            debug!("{}: drifted to {}, returning to {}", self.name(), position, self.target);
            if self.start_move(self.target as i64, false, timing).is_err() {
                warn!("{}: cannot return to {}", self.name(), self.target);
                self.target = position;
            }
        } else {
            self.target = position;
        }
    }

    /// Advance the speed profile and supervise the encoder.
    pub(crate) fn motion_tick(&mut self, now: u32, timing: &StepTiming) {
        let AxisConstraints {
            acceleration,
            max_speed,
            min_speed,
            ..
        } = self.constraints;
        match self.state {
            MotionState::Accel => {
                if self.should_brake() {
                    self.begin_decel(now);
                } else {
                    let speed = self.ramp.accelerate(now, acceleration);
                    if speed >= max_speed {
                        self.apply_speed(max_speed, timing);
                        self.state = MotionState::Move;
                        trace!("{}: cruising at {}", self.name(), self.position());
                    } else {
                        self.apply_speed(speed, timing);
                    }
                }
            }
            MotionState::Move => {
                if self.should_brake() {
                    self.begin_decel(now);
                }
            }
            MotionState::Decel => {
                let speed = self.ramp.decelerate(now, acceleration);
                if speed <= min_speed {
                    self.apply_speed(min_speed, timing);
                    self.state = MotionState::MvSlow;
                    trace!("{}: crawling at {}", self.name(), self.position());
                } else {
                    self.apply_speed(speed, timing);
                }
            }
            MotionState::MvSlow => {}
            _ => return,
        }
        self.supervise(now, timing);
    }

    fn should_brake(&self) -> bool {
        self.stop_requested
            || self
                .direction
                .is_some_and(|d| reached(self.position(), self.decel_start, d))
    }

    fn begin_decel(&mut self, now: u32) {
        self.state = MotionState::Decel;
        self.stop_requested = false;
        self.ramp = Ramp::starting_at(self.speed, now);
        trace!("{}: braking at {}", self.name(), self.position());
    }

    fn supervise(&mut self, now: u32, timing: &StepTiming) {
        let Some(scale) = self.constraints.encoder else {
            return;
        };
        if self.stop_at_step {
            return;
        }

        let ticks = self.read_encoder_ticks(&scale);
        let encoder_position = self.clamp_to_travel(position_from_ticks(ticks, scale.per_step));
        let position = self.position();
        let verdict = self.stall.check(position, ticks, encoder_position, &scale);
        if verdict.resynced() {
            self.tracker.resync(encoder_position);
        }

        match verdict {
            StallVerdict::Slipping => {
                let speed = (self.speed / 2).max(self.constraints.min_speed);
                debug!("{}: slipping, speed {} -> {}", self.name(), self.speed, speed);
                self.apply_speed(speed, timing);
                if matches!(self.state, MotionState::Accel | MotionState::Decel) {
                    self.ramp = Ramp::starting_at(self.speed, now);
                }
                if matches!(self.state, MotionState::Accel | MotionState::Move) {
                    self.decel_start =
                        decel_start(self.position(), self.target, self.constraints.accdec_steps);
                }
            }
            StallVerdict::Stalled => {
                warn!("{}: stalled at {}", self.name(), self.position());
                self.stalled = true;
                self.stop_at_step = true;
                self.stall_lock = self.direction;
            }
            StallVerdict::Healthy | StallVerdict::Insufficient => {}
        }
    }

    // ===== Helpers =====

    fn apply_speed(&mut self, speed: u32, timing: &StepTiming) {
        let (period, achieved) = timing.period_for(speed, self.constraints.microstep_shift);
        self.hw.set_step_period(period);
        self.speed = achieved;
    }

    fn clamp_to_travel(&self, steps: i32) -> i32 {
        let max = self.constraints.max_steps;
        steps.clamp(-max, max)
    }

    pub(super) fn read_encoder_ticks(&mut self, scale: &EncoderScale) -> i32 {
        self.tracker
            .encoder_ticks(&mut self.hw, scale, self.config.encoder_reverse)
    }

    pub(super) fn write_encoder_ticks(&mut self, scale: &EncoderScale, ticks: i32) {
        self.tracker
            .set_encoder_ticks(&mut self.hw, scale, self.config.encoder_reverse, ticks);
    }

    /// Put position, target and encoder in agreement at `steps`.
    pub(super) fn place(&mut self, steps: i32, ticks: Option<i32>) {
        self.tracker.set_position(steps);
        self.target = steps;
        if let Some(scale) = self.constraints.encoder {
            let ticks = ticks.unwrap_or_else(|| ticks_from_position(steps, scale.per_step));
            self.write_encoder_ticks(&scale, ticks);
            self.stall.rebase(steps, ticks);
        }
    }
}
