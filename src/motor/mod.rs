//! Motor module for stepper-supervisor.
//!
//! Provides the per-axis state machine, position tracking, homing and the
//! multi-axis controller.

mod axis;
mod builder;
mod controller;
mod homing;
pub mod position;
pub mod state;

pub use axis::Axis;
pub use builder::MotionControllerBuilder;
pub use controller::MotionController;
pub use homing::HOMING_SETTLE_TICKS;
pub use position::PositionTracker;
pub use state::{HomingState, MotionState};
