//! Error types for stepper-supervisor.
//!
//! Every failure is a local, synchronous return value. Stalls and homing
//! failures are reported as motion states, not as errors.

use core::fmt;

use crate::motion::Direction;
use crate::motor::MotionState;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-supervisor operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motion command rejected
    Motor(MotorError),
}

/// Coarse classification of an error, as reported to command parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Invalid configuration
    Config,
    /// Out-of-range or otherwise invalid argument
    BadValue,
    /// Axis is busy, locked out, or blocked by its end switch
    CantRun,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Speed limits are zero or inverted
    InvalidSpeed {
        /// Configured minimum speed
        min: u32,
        /// Configured maximum speed
        max: u32,
    },
    /// Acceleration must be > 0
    InvalidAcceleration(u32),
    /// Travel limit must be > 0
    InvalidTravel(i32),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Homing back-off must move away from the switch
    InvalidHomingBackoff(i32),
    /// Encoder resolution must be > 0
    InvalidEncoderResolution(u32),
    /// Encoder tolerance must be >= 0
    InvalidEncoderTolerance(f32),
    /// Timer or scheduler settings are unusable
    InvalidTiming,
    /// More axes than the controller can hold
    TooManyAxes(usize),
    /// No axes configured
    NoAxes,
    /// Number of hardware bindings differs from the number of configured axes
    HardwareMismatch {
        /// Configured axes
        axes: usize,
        /// Hardware bindings supplied
        hardware: usize,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion command errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Axis index does not exist
    InvalidAxis(usize),
    /// Target lies outside the configured travel
    TargetOutOfRange {
        /// Requested target in steps
        target: i64,
        /// Travel limit (both signs)
        max: i32,
    },
    /// Operation needs an encoder and the axis has none
    NoEncoder,
    /// Axis is in a state that does not accept the command
    Busy(MotionState),
    /// Axis stalled while moving in this direction
    StallLockout(Direction),
    /// End switch is active and the policy forbids this direction
    EndSwitchBlocked(Direction),
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Motor(e) => e.kind(),
        }
    }
}

impl MotorError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MotorError::InvalidAxis(_)
            | MotorError::TargetOutOfRange { .. }
            | MotorError::NoEncoder => ErrorKind::BadValue,
            MotorError::Busy(_)
            | MotorError::StallLockout(_)
            | MotorError::EndSwitchBlocked(_) => ErrorKind::CantRun,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "BADCONF"),
            ErrorKind::BadValue => write!(f, "BADVAL"),
            ErrorKind::CantRun => write!(f, "CANTRUN"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidSpeed { min, max } => {
                write!(f, "Invalid speed limits: min ({}) must be > 0 and <= max ({})", min, max)
            }
            ConfigError::InvalidAcceleration(v) => write!(f, "Invalid acceleration: {}. Must be > 0", v),
            ConfigError::InvalidTravel(v) => write!(f, "Invalid max travel: {}. Must be > 0", v),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidHomingBackoff(v) => {
                write!(f, "Invalid homing back-off: {}. Must be > 0", v)
            }
            ConfigError::InvalidEncoderResolution(v) => {
                write!(f, "Invalid encoder resolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidEncoderTolerance(v) => {
                write!(f, "Invalid encoder tolerance: {}. Must be >= 0", v)
            }
            ConfigError::InvalidTiming => write!(f, "Invalid timer or scheduler settings"),
            ConfigError::TooManyAxes(n) => write!(f, "Too many axes: {}", n),
            ConfigError::NoAxes => write!(f, "No axes configured"),
            ConfigError::HardwareMismatch { axes, hardware } => {
                write!(f, "{} axes configured but {} hardware bindings given", axes, hardware)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::InvalidAxis(i) => write!(f, "No such axis: {}", i),
            MotorError::TargetOutOfRange { target, max } => {
                write!(f, "Target {} outside travel [-{}, {}]", target, max, max)
            }
            MotorError::NoEncoder => write!(f, "Axis has no encoder"),
            MotorError::Busy(state) => write!(f, "Axis busy in state {}", state.name()),
            MotorError::StallLockout(dir) => write!(f, "Axis stalled moving {:?}", dir),
            MotorError::EndSwitchBlocked(dir) => {
                write!(f, "End switch blocks motion {:?}", dir)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}
