//! Axis motion and homing states.

/// Motion state of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Idle; the step timer is stopped.
    #[default]
    Relax,
    /// Ramping up towards max speed.
    Accel,
    /// Cruising at max speed.
    Move,
    /// Ramping down towards min speed.
    Decel,
    /// Crawling at min speed until the target is reached.
    MvSlow,
    /// Stopped after a persistent stall; the stalled direction is locked out.
    Stall,
    /// Stopped after a failed homing start.
    Err,
}

impl MotionState {
    /// Whether the step timer is (or should be) running.
    #[inline]
    pub fn is_moving(self) -> bool {
        matches!(
            self,
            MotionState::Accel | MotionState::Move | MotionState::Decel | MotionState::MvSlow
        )
    }

    /// Whether the axis stands still after completing or aborting a move.
    #[inline]
    pub fn is_stopped(self) -> bool {
        matches!(self, MotionState::Relax | MotionState::Stall)
    }

    /// State name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            MotionState::Relax => "RELAX",
            MotionState::Accel => "ACCEL",
            MotionState::Move => "MOVE",
            MotionState::Decel => "DECEL",
            MotionState::MvSlow => "MVSLOW",
            MotionState::Stall => "STALL",
            MotionState::Err => "ERR",
        }
    }
}

/// Phase of the homing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingState {
    /// Not homing.
    #[default]
    None,
    /// Fast approach towards the end switch.
    Fast,
    /// Slow move off the switch.
    Slow,
}
