//! # stepper-supervisor
//!
//! Multi-axis stepper motion supervision with encoder stall detection.
//!
//! ## Features
//!
//! - **Trapezoidal and triangular profiles**: time-based ramps between a
//!   start/stop speed and a cruise speed
//! - **Encoder supervision**: slipping axes slow down, persistently stalled
//!   axes stop and refuse the stalled direction
//! - **End switches**: per-axis policy, homing against the negative switch
//! - **Configuration-driven**: axes and timing defined in TOML files
//! - **embedded-hal 1.0**: driver enable, direction and end switch as pins
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_supervisor::MotionController;
//!
//! let config = stepper_supervisor::load_config("axes.toml")?;
//!
//! let mut ctrl = MotionController::builder()
//!     .from_config(&config, [x_axis_hw, y_axis_hw])
//!     .build()?;
//! ctrl.init();
//!
//! // step timer interrupt of axis 0
//! ctrl.on_step_pulse(0);
//!
//! // main loop
//! ctrl.move_to(0, 4000)?;
//! ctrl.process(now_ms);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, EndSwitchPolicy, SystemConfig, TimingConfig};
pub use error::{Error, ErrorKind, Result};
pub use hal::{AxisHardware, PinAxis};
pub use motion::Direction;
pub use motor::{state, Axis, HomingState, MotionController, MotionState};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::Microsteps;
