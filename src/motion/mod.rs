//! Motion module for stepper-supervisor.
//!
//! Provides velocity profile generation and encoder stall supervision.

pub mod profile;
mod stall;

pub use profile::{Direction, Ramp, StepTiming};
pub use stall::{StallDetector, StallVerdict, NSTALLED_MAX, STALLED_STEPS};
