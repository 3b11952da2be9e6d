//! Unit types for configuration values.

use serde::Deserialize;

use crate::error::ConfigError;

/// Microstep divisor: pulses per full step, a power of two up to 256.
///
/// Stored as its log2, which is what period scaling shifts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u16")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microsteps(u8);

impl Microsteps {
    /// One pulse per step.
    pub const FULL: Self = Self(0);
    /// 2 pulses per step.
    pub const HALF: Self = Self(1);
    /// 4 pulses per step.
    pub const QUARTER: Self = Self(2);
    /// 8 pulses per step.
    pub const EIGHTH: Self = Self(3);
    /// 16 pulses per step.
    pub const SIXTEENTH: Self = Self(4);
    /// 32 pulses per step.
    pub const THIRTY_SECOND: Self = Self(5);
    /// 64 pulses per step.
    pub const SIXTY_FOURTH: Self = Self(6);
    /// 128 pulses per step.
    pub const ONE_TWENTY_EIGHTH: Self = Self(7);
    /// 256 pulses per step.
    pub const TWO_FIFTY_SIXTH: Self = Self(8);

    /// Divisor from a pulse count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` unless `value` is a power of two in `1..=256`.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if Self::is_valid(value) {
            Ok(Self(value.trailing_zeros() as u8))
        } else {
            Err(ConfigError::InvalidMicrosteps(value))
        }
    }

    /// Pulses per full step.
    #[inline]
    pub const fn value(self) -> u16 {
        1 << self.0
    }

    /// log2 of the divisor.
    #[inline]
    pub const fn shift(self) -> u8 {
        self.0
    }

    /// Whether `value` is an acceptable divisor.
    #[inline]
    pub fn is_valid(value: u16) -> bool {
        value.is_power_of_two() && value <= Self::TWO_FIFTY_SIXTH.value()
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Microsteps> for u16 {
    fn from(m: Microsteps) -> u16 {
        m.value()
    }
}
