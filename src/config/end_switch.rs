//! End-switch reaction policy.

use serde::Deserialize;

use crate::motion::Direction;

/// How an active end switch restricts motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndSwitchPolicy {
    /// Switch never blocks motion.
    #[default]
    Ignore,
    /// Active switch blocks motion towards negative positions.
    StopMinus,
    /// Active switch blocks motion in either direction.
    StopAny,
}

impl EndSwitchPolicy {
    /// Whether motion in `direction` is forbidden while the switch is active.
    pub fn blocks(self, direction: Direction) -> bool {
        match self {
            EndSwitchPolicy::Ignore => false,
            EndSwitchPolicy::StopMinus => direction == Direction::CounterClockwise,
            EndSwitchPolicy::StopAny => true,
        }
    }

    /// Evaluate the policy against the current switch reading.
    #[inline]
    pub fn check(self, direction: Direction, switch_active: bool) -> bool {
        switch_active && self.blocks(direction)
    }
}
